//! # Telemetry payloads
//!
//! Response shapes for the vehicle's telemetry endpoints. These are consumed
//! for display only, the console never branches control logic on them.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Response of `GET /api/test`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiTestResponse {
    pub message: String,
}

/// Response of `GET /api/system/info`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SystemInfo {
    /// CPU temperature as reported by the vehicle, e.g. `"48.3"`.
    pub cpu_temperature: String,

    /// RAM usage in percent.
    pub ram_usage: f64,

    /// 1-minute load average.
    pub load_system: f64,

    /// Disk usage in percent.
    pub disk_space: f64,
}

/// Response of `GET /api/camera/status`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CameraStatus {
    /// `"OK"` or `"Error"`.
    pub status: String,
    pub message: String,
}

/// Response of `GET /api/orientation`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OrientationReport {
    /// `"success"`, `"warning"` or `"error"`.
    pub status: String,
    pub data: Option<Orientation>,
}

/// Attitude solution from the vehicle's IMU.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Orientation {
    /// Units: degrees
    pub roll: f64,
    /// Units: degrees
    pub pitch: f64,
    /// Units: degrees
    pub yaw: f64,

    pub calibration: ImuCalibration,
}

/// IMU calibration levels, each in 0..=3.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct ImuCalibration {
    pub system: u8,
    pub gyro: u8,
    pub accel: u8,
    pub mag: u8,
}

/// Response of `GET /api/serial/test`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SerialReport {
    /// True if the vehicle's serial link to the thruster board is up.
    pub connected: bool,

    /// Device the link is established on, e.g. `"/dev/ttyACM1"`.
    pub port: Option<String>,

    /// Raw response to the link test command, if one was exchanged.
    pub test_response: Option<String>,

    /// Serial ports visible to the vehicle, reported when not connected.
    #[serde(default)]
    pub available_ports: Vec<SerialPortInfo>,
}

/// One serial port visible to the vehicle.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SerialPortInfo {
    pub device: String,
    pub description: String,
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_orientation_deserialises() {
        let json = r#"{
            "status": "success",
            "data": {
                "roll": -1.5, "pitch": 0.25, "yaw": 182.0,
                "calibration": {"system": 3, "gyro": 3, "accel": 2, "mag": 1}
            }
        }"#;

        let report: OrientationReport = serde_json::from_str(json).unwrap();
        let data = report.data.unwrap();
        assert_eq!(report.status, "success");
        assert_eq!(data.yaw, 182.0);
        assert_eq!(data.calibration.accel, 2);
    }

    #[test]
    fn test_serial_report_without_ports() {
        let json = r#"{"connected": true, "port": "/dev/ttyACM1", "test_response": "OK"}"#;
        let report: SerialReport = serde_json::from_str(json).unwrap();
        assert!(report.connected);
        assert!(report.available_ports.is_empty());
    }
}
