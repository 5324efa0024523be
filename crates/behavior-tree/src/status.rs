//! Status returned by behavior nodes.

/// The result of evaluating a behavior node.
///
/// # Tick Semantics
///
/// A simulation advances in discrete ticks and no node call ever blocks:
/// - Conditions evaluate immediately (e.g., "Is a target in range?")
/// - Actions either complete within the tick or report [`Status::Running`]
///   and are re-entered at the same point on the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The behavior completed successfully.
    ///
    /// For conditions: The condition was met.
    /// For actions: The action executed without errors.
    Success,

    /// The behavior failed.
    ///
    /// For conditions: The condition was not met.
    /// For actions: The action could not be executed (e.g., no valid target).
    Failure,

    /// The behavior needs more ticks to finish.
    ///
    /// The node (and its ancestors) will be re-entered on the next tick.
    Running,
}

impl Status {
    /// Returns `true` if this status is `Success`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` if this status is `Failure`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Returns `true` if this status is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// Returns `true` if this status is terminal (Success or Failure).
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }

    /// Inverts the status: Success becomes Failure and vice versa.
    ///
    /// `Running` is a fixed point: in-progress work stays in progress no
    /// matter how its eventual result will be interpreted.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            Status::Running => Status::Running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invert_is_its_own_inverse() {
        assert_eq!(Status::Success.invert().invert(), Status::Success);
        assert_eq!(Status::Failure.invert().invert(), Status::Failure);
    }

    #[test]
    fn running_is_a_fixed_point_of_invert() {
        assert_eq!(Status::Running.invert(), Status::Running);
    }
}
