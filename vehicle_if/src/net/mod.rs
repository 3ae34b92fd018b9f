//! # Network Module
//!
//! This module provides the vehicle addressing scheme and the outbound
//! command rate limiting used by the console.
//!
//! The vehicle exposes its control API over plain HTTP on a fixed port, with
//! the motion-JPEG stream served from a second port. Commands are produced at
//! the input sampling frequency, which is far higher than the serial link
//! behind the API can absorb, so every outbound command class passes through
//! a [`RateLimiter`] before transmission. The latest sampled value is sent
//! and intermediate values are dropped, there is no buffering or coalescing.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Network parameters for the console.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NetParams {
    /// Address (IP or hostname) of the vehicle, without scheme or port.
    pub vehicle_addr: String,

    /// Port serving the control API.
    pub control_port: u16,

    /// Port serving the motion-JPEG video stream.
    pub stream_port: u16,

    /// Minimum interval between two dispatches of the same command class.
    ///
    /// Units: milliseconds
    pub command_interval_ms: u64,

    /// Timeout applied to each HTTP request.
    ///
    /// Units: milliseconds
    pub request_timeout_ms: u64,
}

/// A minimum-interval gate for one outbound command class.
///
/// `should_dispatch` returns true and records the dispatch time if and only
/// if more than the minimum interval has passed since the last recorded
/// dispatch (or no dispatch has been recorded yet). On a false result the
/// state is left unchanged.
///
/// Each command class (thrusters, LEDs) owns its own independent instance,
/// the gates are never shared.
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Option<Instant>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised when validating the vehicle address.
#[derive(Debug, Error)]
pub enum NetParamsError {
    #[error("The vehicle address is empty")]
    EmptyAddress,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl NetParams {
    /// Check that the parameters describe a reachable vehicle.
    ///
    /// An empty (or all-whitespace) address means no command can ever be
    /// constructed, so it is rejected here rather than silently skipped at
    /// each dispatch.
    pub fn validate(&self) -> Result<(), NetParamsError> {
        if self.vehicle_addr.trim().is_empty() {
            return Err(NetParamsError::EmptyAddress);
        }

        Ok(())
    }

    /// URL of the thruster control endpoint.
    pub fn motors_control_url(&self) -> String {
        format!("{}/motors/control", self.api_root())
    }

    /// URL of the LED control endpoint.
    pub fn led_control_url(&self) -> String {
        format!("{}/led/control", self.api_root())
    }

    /// URL of the API connectivity test endpoint.
    pub fn api_test_url(&self) -> String {
        format!("{}/test", self.api_root())
    }

    /// URL of the system telemetry endpoint.
    pub fn system_info_url(&self) -> String {
        format!("{}/system/info", self.api_root())
    }

    /// URL of the camera status endpoint.
    pub fn camera_status_url(&self) -> String {
        format!("{}/camera/status", self.api_root())
    }

    /// URL of the orientation telemetry endpoint.
    pub fn orientation_url(&self) -> String {
        format!("{}/orientation", self.api_root())
    }

    /// URL of the serial link diagnostic endpoint.
    ///
    /// With `reconnect` set the vehicle is asked to force a reconnection to
    /// the thruster board before reporting.
    pub fn serial_test_url(&self, reconnect: bool) -> String {
        if reconnect {
            format!("{}/serial/test?reconnect=true", self.api_root())
        } else {
            format!("{}/serial/test", self.api_root())
        }
    }

    /// URL of the motion-JPEG video stream.
    pub fn stream_url(&self) -> String {
        format!(
            "http://{}:{}/?action=stream",
            self.vehicle_addr.trim(),
            self.stream_port
        )
    }

    /// Minimum interval between dispatches of one command class.
    pub fn command_interval(&self) -> Duration {
        Duration::from_millis(self.command_interval_ms)
    }

    /// Per-request HTTP timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    fn api_root(&self) -> String {
        format!("http://{}:{}/api", self.vehicle_addr.trim(), self.control_port)
    }
}

impl RateLimiter {
    /// Create a new gate with the given minimum dispatch interval.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: None,
        }
    }

    /// Ask the gate whether a command may be dispatched at `now`.
    ///
    /// Records `now` as the last dispatch time on a true result only.
    pub fn should_dispatch(&mut self, now: Instant) -> bool {
        let permitted = match self.last_dispatch {
            Some(last) => now.duration_since(last) > self.min_interval,
            None => true,
        };

        if permitted {
            self.last_dispatch = Some(now);
        }

        permitted
    }

    /// Record a dispatch which was made outside the gate.
    ///
    /// Used by the boost path, which transmits unconditionally but must
    /// still space the following throttled command.
    pub fn record_dispatch(&mut self, now: Instant) {
        self.last_dispatch = Some(now);
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> NetParams {
        NetParams {
            vehicle_addr: "192.168.0.17".into(),
            control_port: 5000,
            stream_port: 8080,
            command_interval_ms: 100,
            request_timeout_ms: 2000,
        }
    }

    #[test]
    fn test_first_dispatch_permitted() {
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        assert!(limiter.should_dispatch(Instant::now()));
    }

    #[test]
    fn test_dispatch_within_interval_blocked() {
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        let t0 = Instant::now();

        assert!(limiter.should_dispatch(t0));
        assert!(!limiter.should_dispatch(t0 + Duration::from_millis(50)));
    }

    #[test]
    fn test_dispatch_after_interval_permitted() {
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        let t0 = Instant::now();

        assert!(limiter.should_dispatch(t0));
        assert!(limiter.should_dispatch(t0 + Duration::from_millis(101)));
    }

    #[test]
    fn test_blocked_dispatch_leaves_state_unchanged() {
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        let t0 = Instant::now();

        assert!(limiter.should_dispatch(t0));
        // Blocked attempt at t+60 must not push the window out
        assert!(!limiter.should_dispatch(t0 + Duration::from_millis(60)));
        assert!(limiter.should_dispatch(t0 + Duration::from_millis(101)));
    }

    #[test]
    fn test_record_dispatch_spaces_next_command() {
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        let t0 = Instant::now();

        limiter.record_dispatch(t0);
        assert!(!limiter.should_dispatch(t0 + Duration::from_millis(50)));
        assert!(limiter.should_dispatch(t0 + Duration::from_millis(150)));
    }

    #[test]
    fn test_urls() {
        let params = params();
        assert_eq!(
            params.motors_control_url(),
            "http://192.168.0.17:5000/api/motors/control"
        );
        assert_eq!(
            params.led_control_url(),
            "http://192.168.0.17:5000/api/led/control"
        );
        assert_eq!(
            params.serial_test_url(true),
            "http://192.168.0.17:5000/api/serial/test?reconnect=true"
        );
        assert_eq!(params.stream_url(), "http://192.168.0.17:8080/?action=stream");
    }

    #[test]
    fn test_empty_address_rejected() {
        let mut params = params();
        params.vehicle_addr = "   ".into();
        assert!(params.validate().is_err());
    }
}
