/// A single field of a partial update.
///
/// Distinguishes a field that was not sent at all from one that was sent as
/// `null`, so an update never clobbers fields the caller did not mention.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Absent => Patch::Absent,
            Self::Null => Patch::Null,
            Self::Value(v) => Patch::Value(f(v)),
        }
    }

    /// Write into `slot`. `Null` stores the value produced by `reset`.
    pub fn apply_to(self, slot: &mut T, reset: impl FnOnce() -> T) {
        match self {
            Self::Absent => {}
            Self::Null => *slot = reset(),
            Self::Value(v) => *slot = v,
        }
    }

    /// Write into a field that has no empty state. `Null` is ignored.
    pub fn apply_required(self, slot: &mut T) {
        if let Self::Value(v) = self {
            *slot = v;
        }
    }
}
