//! Module interfaces
//!
//! Each control module in `console_exec` shall implement all the items in
//! this module.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::params;
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// The module's internal state.
pub trait State {
    /// Data required for cyclic processing.
    type InputData;
    /// Data produced by cyclic processing.
    type OutputData;
    /// A report on the status of the cyclic processing.
    type StatusReport;
    /// An error which can occur during cyclic processing.
    type ProcError;

    /// Initialise the module from its parameter file.
    ///
    /// # Inputs
    /// - `param_file`: The module's parameter file, relative to the params
    ///   directory.
    ///
    /// # Outputs
    /// - On success `Ok(())`.
    /// - On error the parameter load error.
    fn init(&mut self, param_file: &'static str, session: &Session)
        -> Result<(), params::LoadError>;

    /// Main module processing function, run once per control cycle.
    ///
    /// # Inputs
    /// - `input_data`: The data required for processing by the module.
    ///
    /// # Outputs
    /// - On success a tuple of the output data and status report.
    /// - On error a `ProcError` instance.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
