//! Backend reachability indicator

use crate::error::ApiError;
use crate::http::HttpResponse;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApiStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

impl ApiStatus {
    /// Any HTTP response counts as online; only a transport failure is offline
    pub fn from_probe(outcome: &Result<HttpResponse, ApiError>) -> Self {
        match outcome {
            Ok(_) => ApiStatus::Online,
            Err(e) if e.is_unreachable() => ApiStatus::Offline,
            Err(_) => ApiStatus::Online,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApiStatus::Checking => "checking",
            ApiStatus::Online => "online",
            ApiStatus::Offline => "offline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_probe() {
        assert_eq!(ApiStatus::default(), ApiStatus::Checking);
        let ok = Ok(HttpResponse::new(404, Vec::new()));
        assert_eq!(ApiStatus::from_probe(&ok), ApiStatus::Online);
        let down = Err(ApiError::Unreachable("refused".into()));
        assert_eq!(ApiStatus::from_probe(&down), ApiStatus::Offline);
        assert_eq!(ApiStatus::Offline.label(), "offline");
    }
}
