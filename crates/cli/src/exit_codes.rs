#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitCode {
    DatabaseUnreachable,
    ErrorWriting,
}

impl From<ExitCode> for i32 {
    fn from(value: ExitCode) -> Self {
        match value {
            ExitCode::DatabaseUnreachable => 201,
            ExitCode::ErrorWriting => 204,
        }
    }
}
