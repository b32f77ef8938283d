/// Decides whether a cell can be entered. Implementations must be deterministic, side-effect
/// free and total: coordinates outside the map conventionally report `true`.
///
/// Any `Fn(i32, i32) -> bool` closure is an oracle, as is [BlockGrid](crate::BlockGrid).
pub trait BlockedOracle {
    fn is_blocked(&self, x: i32, y: i32) -> bool;

    fn is_free(&self, x: i32, y: i32) -> bool {
        !self.is_blocked(x, y)
    }
}

impl<F> BlockedOracle for F
where
    F: Fn(i32, i32) -> bool,
{
    #[inline]
    fn is_blocked(&self, x: i32, y: i32) -> bool {
        self(x, y)
    }
}
