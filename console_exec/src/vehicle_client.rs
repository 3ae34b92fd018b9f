//! # Vehicle Client
//!
//! This module dispatches control commands to the vehicle's HTTP API.
//!
//! Commands are fire-and-forget: the caller hands a demand to the client and
//! carries on with the cycle. A background worker owns the blocking HTTP
//! calls, fed over a channel, so the control loop never waits on the
//! network. Each command class passes through its own rate limiter before it
//! is enqueued; a blocked command is simply dropped, the next cycle
//! re-attempts with fresh state.
//!
//! The thruster chain and the melody chain may both attempt dispatch inside
//! the same limiter window. The limiter lets the first through and drops the
//! second, so ordering between the two chains within one window is not
//! deterministic and must not be relied upon.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{debug, warn};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::Instant;

// Internal
use vehicle_if::{
    eqpt::led::LedControlRequest,
    eqpt::thrusters::{MotorsControlRequest, ThrusterDems},
    eqpt::ControlResponse,
    net::{NetParams, NetParamsError, RateLimiter},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Client dispatching control commands to the vehicle.
pub struct VehicleClient {
    sender: Sender<CmdRequest>,

    dems_limiter: RateLimiter,

    led_limiter: RateLimiter,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command queued for the dispatch worker.
enum CmdRequest {
    Motors(MotorsControlRequest),
    Led(LedControlRequest),
}

#[derive(thiserror::Error, Debug)]
pub enum VehicleClientError {
    #[error("Invalid network parameters: {0}")]
    InvalidParams(#[from] NetParamsError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl VehicleClient {
    /// Create a new instance of the vehicle client.
    ///
    /// Validates the vehicle address and spawns the dispatch worker. The
    /// worker exits on its own when the client is dropped.
    pub fn new(params: &NetParams) -> Result<Self, VehicleClientError> {
        params.validate()?;

        let agent = ureq::AgentBuilder::new()
            .timeout(params.request_timeout())
            .build();

        let motors_url = params.motors_control_url();
        let led_url = params.led_control_url();

        let (sender, receiver) = channel();

        thread::spawn(move || dispatch_worker(agent, motors_url, led_url, receiver));

        Ok(Self {
            sender,
            dems_limiter: RateLimiter::new(params.command_interval()),
            led_limiter: RateLimiter::new(params.command_interval()),
        })
    }

    /// Dispatch thruster demands, subject to the thruster rate limit.
    ///
    /// Returns true if the command passed the gate and was enqueued.
    pub fn dispatch_dems(&mut self, dems: &ThrusterDems) -> bool {
        if !self.dems_limiter.should_dispatch(Instant::now()) {
            return false;
        }

        self.send(CmdRequest::Motors(dems.into()));
        true
    }

    /// Dispatch thruster demands immediately, bypassing the gate.
    ///
    /// Used by the boost path. The dispatch time is still recorded so the
    /// following throttled command keeps its spacing.
    pub fn dispatch_dems_now(&mut self, dems: &ThrusterDems) {
        self.dems_limiter.record_dispatch(Instant::now());
        self.send(CmdRequest::Motors(dems.into()));
    }

    /// Dispatch an LED brightness, subject to the LED rate limit.
    ///
    /// Returns true if the command passed the gate and was enqueued.
    pub fn dispatch_led(&mut self, brightness: u8) -> bool {
        if !self.led_limiter.should_dispatch(Instant::now()) {
            return false;
        }

        self.send(CmdRequest::Led(LedControlRequest::new(brightness)));
        true
    }

    fn send(&self, request: CmdRequest) {
        // The worker only dies if its thread panicked, all transport errors
        // are handled inside it. Dropping the command matches the no-retry
        // policy.
        if self.sender.send(request).is_err() {
            warn!("Dispatch worker is gone, command dropped");
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Dispatch worker loop.
///
/// Runs until the channel's send side is dropped. Transport failures are
/// logged and the command dropped, there is no retry and no user-facing
/// alert.
fn dispatch_worker(
    agent: ureq::Agent,
    motors_url: String,
    led_url: String,
    receiver: Receiver<CmdRequest>,
) {
    for request in receiver.iter() {
        let (url, body) = match &request {
            CmdRequest::Motors(m) => (&motors_url, serde_json::to_value(m)),
            CmdRequest::Led(l) => (&led_url, serde_json::to_value(l)),
        };

        let body = match body {
            Ok(b) => b,
            Err(e) => {
                warn!("Could not serialise command, dropped: {}", e);
                continue;
            }
        };

        match agent.post(url).send_json(body) {
            Ok(response) => match response.into_json::<ControlResponse>() {
                Ok(r) => debug!("Control response: {:?}", r),
                Err(e) => warn!("Could not parse control response: {}", e),
            },
            Err(e) => warn!("Command dispatch failed, dropped: {}", e),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn params(addr: &str) -> NetParams {
        NetParams {
            vehicle_addr: addr.into(),
            control_port: 5000,
            stream_port: 8080,
            command_interval_ms: 100,
            request_timeout_ms: 100,
        }
    }

    #[test]
    fn test_empty_address_rejected() {
        assert!(VehicleClient::new(&params("")).is_err());
    }

    #[test]
    fn test_dispatch_is_gated() {
        // The worker will fail to reach this address, which is fine: the
        // gate is applied before the command is enqueued.
        let mut client = VehicleClient::new(&params("127.0.0.1")).unwrap();
        let dems = ThrusterDems::stationary();

        assert!(client.dispatch_dems(&dems));
        assert!(!client.dispatch_dems(&dems));
    }

    #[test]
    fn test_led_gate_independent_of_dems_gate() {
        let mut client = VehicleClient::new(&params("127.0.0.1")).unwrap();
        let dems = ThrusterDems::stationary();

        assert!(client.dispatch_dems(&dems));
        // A thruster dispatch must not consume the LED window
        assert!(client.dispatch_led(100));
    }
}
