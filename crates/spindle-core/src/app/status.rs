//! Status - 操作結果のステータス分類
//!
//! HTTP などの外側のレイヤーが、エラー種別から応答コードを決めるための分類です。

use serde::Serialize;

use crate::domain::{AdminError, ErrorKind};

/// Status class of an operation's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Ok,
    NotFound,
    /// Invalid state or non-empty queue.
    Conflict,
    BadRequest,
    Unavailable,
}

impl StatusClass {
    pub fn http_status(self) -> u16 {
        match self {
            StatusClass::Ok => 200,
            StatusClass::NotFound => 404,
            StatusClass::Conflict => 409,
            StatusClass::BadRequest => 400,
            StatusClass::Unavailable => 503,
        }
    }

    /// Class of any operation result.
    pub fn of<T>(result: &Result<T, AdminError>) -> Self {
        match result {
            Ok(_) => StatusClass::Ok,
            Err(err) => err.status_class(),
        }
    }
}

impl From<ErrorKind> for StatusClass {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => StatusClass::NotFound,
            ErrorKind::InvalidState | ErrorKind::QueueNotEmpty => StatusClass::Conflict,
            ErrorKind::Validation => StatusClass::BadRequest,
            ErrorKind::StoreUnavailable => StatusClass::Unavailable,
        }
    }
}

impl AdminError {
    pub fn status_class(&self) -> StatusClass {
        self.kind().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskOp, TaskState};
    use rstest::rstest;

    #[rstest]
    #[case(AdminError::not_found("queue", "email"), 404)]
    #[case(AdminError::InvalidState { op: TaskOp::Run, state: TaskState::Active }, 409)]
    #[case(AdminError::QueueNotEmpty { queue: "email".into(), remaining: 2 }, 409)]
    #[case(AdminError::validation("page", "pages start at 1"), 400)]
    #[case(AdminError::unavailable("connection refused"), 503)]
    fn errors_map_to_http_status(#[case] err: AdminError, #[case] status: u16) {
        assert_eq!(err.status_class().http_status(), status);
    }

    #[test]
    fn ok_result_is_ok_class() {
        let result: Result<(), AdminError> = Ok(());
        assert_eq!(StatusClass::of(&result), StatusClass::Ok);
    }
}
