// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use slotfit_model::problem::ProblemError;

/// A scheduler configuration that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse scheduler config: {0}")]
    Parse(String),

    #[error("failed to serialize scheduler config: {0}")]
    Serialize(String),

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },
}

/// Why `schedule` produced no placement.
///
/// Running out of budget is an error here; a window in which nothing fits is
/// not, and yields an empty placement instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError<T>
where
    T: std::fmt::Debug + std::fmt::Display,
{
    #[error("invalid problem: {0}")]
    InvalidProblem(#[from] ProblemError<T>),

    #[error("{tasks} tasks exceed the limit of {limit} supported by the strategy")]
    TooManyTasks { tasks: usize, limit: usize },

    #[error("search abandoned: {reason}")]
    Abandoned { reason: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotfit_model::index::TaskIndex;

    #[test]
    fn test_messages() {
        let err: ScheduleError<i64> = ProblemError::NonPositiveDuration {
            task: TaskIndex::new(2),
            duration: 0,
        }
        .into();
        assert!(err.to_string().starts_with("invalid problem: "));

        let err = ScheduleError::<i64>::TooManyTasks {
            tasks: 70,
            limit: 63,
        };
        assert_eq!(
            err.to_string(),
            "70 tasks exceed the limit of 63 supported by the strategy"
        );

        let err: ScheduleError<i64> = ConfigError::ZeroLimit {
            field: "step_limit",
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid configuration: step_limit must be greater than zero"
        );
    }
}
