//! # Telemetry Client
//!
//! This module polls the vehicle's telemetry endpoints on their own cadences
//! and hands typed updates to the main loop over a channel. Unlike the
//! command path, telemetry fetch errors ARE surfaced: they are logged and
//! carried in the update so the display can show the failure.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use vehicle_if::{
    net::NetParams,
    tm::{ApiTestResponse, CameraStatus, OrientationReport, SerialReport, SystemInfo},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Poll cadence for the orientation endpoint.
const ORIENTATION_PERIOD: Duration = Duration::from_millis(200);

/// Poll cadence for the system info and camera status endpoints.
const SYSTEM_PERIOD: Duration = Duration::from_secs(5);

/// Poll cadence for the serial link diagnostic endpoint.
const SERIAL_PERIOD: Duration = Duration::from_secs(10);

/// Granularity of the poller's internal clock.
const POLL_TICK: Duration = Duration::from_millis(50);

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Client polling the vehicle's telemetry endpoints in the background.
pub struct TmClient {
    receiver: Receiver<TmUpdate>,

    stop: Arc<AtomicBool>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// One telemetry update from the poller.
///
/// The `Err` side carries a displayable description of the fetch failure.
pub enum TmUpdate {
    System(Result<SystemInfo, String>),
    Camera(Result<CameraStatus, String>),
    Orientation(Result<OrientationReport, String>),
    Serial(Result<SerialReport, String>),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TmClient {
    /// Create a new telemetry client and start its poller thread.
    pub fn new(params: &NetParams) -> Self {
        let (sender, receiver) = channel();
        let stop = Arc::new(AtomicBool::new(false));

        let agent = ureq::AgentBuilder::new()
            .timeout(params.request_timeout())
            .build();
        let params = params.clone();
        let thread_stop = stop.clone();

        thread::spawn(move || tm_poll_thread(agent, params, sender, thread_stop));

        Self { receiver, stop }
    }

    /// Get the next pending telemetry update, if any.
    ///
    /// Never blocks, the main loop drains this once per cycle.
    pub fn try_recv(&self) -> Option<TmUpdate> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for TmClient {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Check the control API is reachable.
///
/// A blocking one-shot, used during initialisation only.
pub fn test_api(params: &NetParams) -> Result<ApiTestResponse, String> {
    let agent = ureq::AgentBuilder::new()
        .timeout(params.request_timeout())
        .build();

    fetch(&agent, &params.api_test_url())
}

/// Run the vehicle's serial link diagnostic.
///
/// With `reconnect` set the vehicle is asked to re-establish the link to the
/// thruster board first. A blocking one-shot, used during initialisation
/// only.
pub fn test_serial(params: &NetParams, reconnect: bool) -> Result<SerialReport, String> {
    let agent = ureq::AgentBuilder::new()
        .timeout(params.request_timeout())
        .build();

    fetch(&agent, &params.serial_test_url(reconnect))
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Telemetry poller loop.
///
/// Each endpoint has its own cadence; none of them is synchronised with the
/// control cycle. The loop exits when the client is dropped or when the main
/// loop's receiver is gone.
fn tm_poll_thread(
    agent: ureq::Agent,
    params: NetParams,
    sender: Sender<TmUpdate>,
    stop: Arc<AtomicBool>,
) {
    let start = Instant::now();
    let mut orientation_due = start;
    let mut system_due = start;
    let mut serial_due = start;

    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        let now = Instant::now();
        let mut updates: Vec<TmUpdate> = vec![];

        if now >= orientation_due {
            orientation_due = now + ORIENTATION_PERIOD;
            updates.push(TmUpdate::Orientation(fetch(
                &agent,
                &params.orientation_url(),
            )));
        }

        if now >= system_due {
            system_due = now + SYSTEM_PERIOD;
            updates.push(TmUpdate::System(fetch(&agent, &params.system_info_url())));
            updates.push(TmUpdate::Camera(fetch(&agent, &params.camera_status_url())));
        }

        if now >= serial_due {
            serial_due = now + SERIAL_PERIOD;
            updates.push(TmUpdate::Serial(fetch(
                &agent,
                &params.serial_test_url(false),
            )));
        }

        for update in updates {
            if sender.send(update).is_err() {
                // Main loop is gone, stop polling
                return;
            }
        }

        thread::sleep(POLL_TICK);
    }
}

/// Fetch one endpoint and parse its JSON body.
fn fetch<T>(agent: &ureq::Agent, url: &str) -> Result<T, String>
where
    T: DeserializeOwned,
{
    agent
        .get(url)
        .call()
        .map_err(|e| format!("{}", e))?
        .into_json::<T>()
        .map_err(|e| format!("Bad telemetry payload: {}", e))
}
