use std::time::Duration;

use crate::FailureKind;

pub(crate) fn build_client(
    connect_timeout: Duration,
    request_timeout: Duration,
) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(request_timeout)
        .build()
}

pub(crate) fn failure_kind(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        return FailureKind::Timeout;
    }
    if err.is_builder() {
        return FailureKind::InvalidUrl;
    }
    FailureKind::Network
}
