//! MIDI input devices via midir.
//!
//! Exactly one input port is bound at a time. Ports that are not bound are
//! never connected, so their messages are dropped rather than queued.

use midir::{MidiInput, MidiInputConnection};
use tracing::info;

use crate::error::NotationError;

const CLIENT_NAME: &str = "chordstaff";

/// Callback for raw bytes from the bound port. Runs on the MIDI thread.
pub type MidiCallback = Box<dyn FnMut(&[u8]) + Send + 'static>;

/// Names of the available MIDI input ports
pub fn list_input_devices() -> Result<Vec<String>, NotationError> {
    let midi_in =
        MidiInput::new(CLIENT_NAME).map_err(|e| NotationError::Device(e.to_string()))?;

    Ok(midi_in
        .ports()
        .iter()
        .filter_map(|port| midi_in.port_name(port).ok())
        .collect())
}

/// A connection to one input port. Dropping it closes the port.
pub struct DeviceBinding {
    connection: Option<MidiInputConnection<()>>,
    pub port_name: String,
}

impl DeviceBinding {
    /// Connect the first input whose name contains `pattern`
    pub fn bind(pattern: &str, mut callback: MidiCallback) -> Result<Self, NotationError> {
        let mut midi_in =
            MidiInput::new(CLIENT_NAME).map_err(|e| NotationError::Device(e.to_string()))?;
        midi_in.ignore(midir::Ignore::All);

        let ports = midi_in.ports();
        let port = ports
            .iter()
            .find(|p| {
                midi_in
                    .port_name(p)
                    .map(|n| n.contains(pattern))
                    .unwrap_or(false)
            })
            .ok_or_else(|| NotationError::Device(format!("no input port matching '{}'", pattern)))?;

        let port_name = midi_in
            .port_name(port)
            .map_err(|e| NotationError::Device(e.to_string()))?;

        let connection = midi_in
            .connect(
                port,
                "chordstaff-input",
                move |_timestamp_us, data, _| callback(data),
                (),
            )
            .map_err(|e| NotationError::Device(e.to_string()))?;

        info!("Bound MIDI input: {}", port_name);

        Ok(Self {
            connection: Some(connection),
            port_name,
        })
    }

    pub fn close(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
            info!("Closed MIDI input: {}", self.port_name);
        }
    }
}

impl Drop for DeviceBinding {
    fn drop(&mut self) {
        self.close();
    }
}
