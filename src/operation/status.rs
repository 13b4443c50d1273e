use std::fmt;

use http::StatusCode;

/// Status of a documented response: either one of the registered codes or
/// a raw numeric code outside that set (e.g. `210`).
#[derive(Debug, Clone, Copy)]
pub enum OperationStatus {
    Standard(StatusCode),
    Raw(u16),
}

impl OperationStatus {
    pub fn from_code(code: u16) -> Self {
        match StatusCode::from_u16(code) {
            Ok(status) if status.canonical_reason().is_some() => OperationStatus::Standard(status),
            _ => OperationStatus::Raw(code),
        }
    }

    pub fn from_status(status: StatusCode) -> Self {
        Self::from_code(status.as_u16())
    }

    pub fn code(&self) -> u16 {
        match self {
            OperationStatus::Standard(status) => status.as_u16(),
            OperationStatus::Raw(code) => *code,
        }
    }

    pub fn reason_phrase(&self) -> Option<&'static str> {
        match self {
            OperationStatus::Standard(status) => status.canonical_reason(),
            OperationStatus::Raw(_) => None,
        }
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, OperationStatus::Standard(_))
    }
}

impl PartialEq for OperationStatus {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for OperationStatus {}

impl PartialEq<StatusCode> for OperationStatus {
    fn eq(&self, other: &StatusCode) -> bool {
        self.code() == other.as_u16()
    }
}

impl From<StatusCode> for OperationStatus {
    fn from(status: StatusCode) -> Self {
        Self::from_status(status)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason_phrase() {
            Some(reason) => write!(f, "{} {}", self.code(), reason),
            None => write!(f, "{}", self.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_codes_are_standard() {
        let status = OperationStatus::from_code(200);
        assert!(status.is_standard());
        assert_eq!(status, StatusCode::OK);
        assert_eq!(status.reason_phrase(), Some("OK"));
        assert_eq!(status.to_string(), "200 OK");
    }

    #[test]
    fn unregistered_codes_stay_raw() {
        let status = OperationStatus::from_code(210);
        assert!(!status.is_standard());
        assert_eq!(status.code(), 210);
        assert_eq!(status.reason_phrase(), None);
        assert_eq!(status.to_string(), "210");

        assert_eq!(OperationStatus::from_code(1000).code(), 1000);
    }

    #[test]
    fn equality_compares_numeric_codes() {
        let standard = OperationStatus::Standard(StatusCode::NOT_FOUND);
        let raw = OperationStatus::Raw(404);
        assert_eq!(standard, raw);
        assert_ne!(standard, OperationStatus::Raw(410));
    }
}
