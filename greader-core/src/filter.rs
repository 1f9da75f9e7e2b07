//! State filter compilation.
//!
//! The `it` (include) and `xt` (exclude) parameters of listing requests are
//! compiled into a [`StateMask`]: the include mask with the exclude bits
//! cleared. Each bit admits one class of entries, so a mask can be read
//! as two independent constraints (read state and starred state). The
//! `ot`/`nt` parameters become a [`DateRange`].

use bitflags::bitflags;
use greader_types::StateToken;

bitflags! {
    /// Entry classes admitted by a listing request.
    ///
    /// The read axis uses `READ`/`UNREAD`, the starred axis uses
    /// `STARRED`/`UNSTARRED`. Both bits of an axis set means no constraint
    /// on that axis, neither bit set means nothing can match.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateMask: u8 {
        /// Read entries are admitted.
        const READ = 1;
        /// Unread entries are admitted.
        const UNREAD = 1 << 1;
        /// Starred entries are admitted.
        const STARRED = 1 << 2;
        /// Entries without a star are admitted.
        const UNSTARRED = 1 << 3;
    }
}

/// Constraint on one axis of a [`StateMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tristate {
    /// No constraint.
    Any,
    /// The flag must have this value.
    Only(bool),
    /// No entry can match.
    Nothing,
}

impl StateMask {
    /// Mask selected by an include (`it`) token. Empty or unrecognized
    /// tokens admit everything.
    pub fn include(token: &str) -> Self {
        match StateToken::parse(token) {
            Some(StateToken::Read) => Self::READ | Self::STARRED | Self::UNSTARRED,
            Some(StateToken::Unread) => Self::UNREAD | Self::STARRED | Self::UNSTARRED,
            Some(StateToken::Starred) => Self::READ | Self::UNREAD | Self::STARRED,
            Some(StateToken::ReadingList) | None => Self::all(),
        }
    }

    /// Bits cleared by an exclude (`xt`) token. Unrecognized tokens clear
    /// nothing.
    pub fn exclude(token: &str) -> Self {
        match StateToken::parse(token) {
            Some(StateToken::Read) => Self::READ,
            Some(StateToken::Unread) => Self::UNREAD,
            Some(StateToken::Starred) => Self::STARRED,
            Some(StateToken::ReadingList) | None => Self::empty(),
        }
    }

    /// `include AND NOT exclude`.
    pub fn compile(include: &str, exclude: &str) -> Self {
        Self::include(include).difference(Self::exclude(exclude))
    }

    /// Constraint on the read flag.
    pub fn read_state(&self) -> Tristate {
        axis(self.contains(Self::READ), self.contains(Self::UNREAD))
    }

    /// Constraint on the starred flag.
    pub fn starred_state(&self) -> Tristate {
        axis(self.contains(Self::STARRED), self.contains(Self::UNSTARRED))
    }

    /// Whether no entry can satisfy the mask.
    pub fn matches_nothing(&self) -> bool {
        self.read_state() == Tristate::Nothing || self.starred_state() == Tristate::Nothing
    }

    /// Whether an entry with the given flags satisfies the mask.
    pub fn matches(&self, is_read: bool, is_starred: bool) -> bool {
        let read_ok = if is_read {
            self.contains(Self::READ)
        } else {
            self.contains(Self::UNREAD)
        };
        let star_ok = if is_starred {
            self.contains(Self::STARRED)
        } else {
            self.contains(Self::UNSTARRED)
        };
        read_ok && star_ok
    }
}

fn axis(set: bool, unset: bool) -> Tristate {
    match (set, unset) {
        (true, true) => Tristate::Any,
        (true, false) => Tristate::Only(true),
        (false, true) => Tristate::Only(false),
        (false, false) => Tristate::Nothing,
    }
}

/// Inclusive crawl-time bounds in epoch seconds. Either bound may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    /// Lower bound (`ot`).
    pub min: Option<i64>,
    /// Upper bound (`nt`).
    pub max: Option<i64>,
}

impl DateRange {
    /// Build from the `ot`/`nt` parameters, where `0` means unbounded.
    pub fn from_params(start: i64, stop: i64) -> Self {
        Self {
            min: (start != 0).then_some(start),
            max: (stop != 0).then_some(stop),
        }
    }

    /// Whether a timestamp falls in the range.
    pub fn contains(&self, secs: i64) -> bool {
        self.min.map_or(true, |min| secs >= min) && self.max.map_or(true, |max| secs <= max)
    }

    /// Whether neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Compiled filter of a listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryFilter {
    /// Admitted entry classes.
    pub state: StateMask,
    /// Crawl-time bounds.
    pub dates: DateRange,
}

impl EntryFilter {
    /// Compile the `it`, `xt`, `ot` and `nt` parameters.
    pub fn compile(include: &str, exclude: &str, start: i64, stop: i64) -> Self {
        Self {
            state: StateMask::compile(include, exclude),
            dates: DateRange::from_params(start, stop),
        }
    }
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self {
            state: StateMask::all(),
            dates: DateRange::default(),
        }
    }
}
