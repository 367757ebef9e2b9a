//! Network-facing endpoints, without any socket code.
//!
//! The application owns the HTTP server (and the static control page). It
//! hands each request's method, path and form body to [`handle`], which maps
//! it onto the bridge and returns the reply to write back:
//!
//! | Route | Form | Reply |
//! |---|---|---|
//! | `GET /data` | | JSON status |
//! | `POST /set_perm_v`, `/set_online_v` | `value=<volts>` | acknowledgement |
//! | `POST /set_perm_c`, `/set_online_c` | `value=<fraction>` | acknowledgement |
//! | `POST /set_diesel_input_c` | `value=<amps>` | acknowledgement |
//! | `POST /set_walk_in_time` | `value=<seconds>` | acknowledgement |
//! | `POST /set_fan_speed` | `speed=auto\|full` | acknowledgement |
//! | `POST /set_walk_in` | `state=on\|off` | acknowledgement |
//!
//! Parameters are read from the body, then from the query string.
use core::fmt::Write;

use heapless::String;

use crate::core::{Argument, CommandOpcode, FanSpeed, WriteCommand};
use crate::error::{CommandError, ValidationError};
use crate::protocol::control::controller::StatusReport;
use crate::protocol::control::gate::Ack;
use crate::protocol::control::supervisor::{BridgeHandle, SubmitResult};

/// Capacity of a reply body.
pub const BODY_CAP: usize = 512;

pub const CONTENT_JSON: &str = "application/json";
pub const CONTENT_TEXT: &str = "text/plain";

const OVERFLOW_MESSAGE: &str = "Response too large.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Post,
    Other,
}

impl Method {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "GET" => Method::Get,
            "POST" => Method::Post,
            _ => Method::Other,
        }
    }
}

/// Where a request lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Route {
    Status,
    /// A write endpoint; the error carries the operator message.
    Write(Result<WriteCommand, ValidationError>),
    NotFound,
}

/// Reply handed back to the HTTP server.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String<BODY_CAP>,
}

impl HttpReply {
    fn text(status: u16, message: &str) -> Self {
        match String::try_from(message) {
            Ok(body) => Self {
                status,
                content_type: CONTENT_TEXT,
                body,
            },
            Err(_) => Self::overflow(),
        }
    }

    fn overflow() -> Self {
        Self {
            status: 500,
            content_type: CONTENT_TEXT,
            body: String::try_from(OVERFLOW_MESSAGE).unwrap_or_default(),
        }
    }
}

//==================================================================================ROUTING
fn write_opcode(path: &str) -> Option<CommandOpcode> {
    let opcode = match path {
        "/set_perm_v" => CommandOpcode::PermanentVoltage,
        "/set_online_v" => CommandOpcode::OnlineVoltage,
        "/set_perm_c" => CommandOpcode::PermanentCurrentLimit,
        "/set_online_c" => CommandOpcode::OnlineCurrentLimit,
        "/set_diesel_input_c" => CommandOpcode::MaxInputCurrent,
        "/set_fan_speed" => CommandOpcode::FanSpeed,
        "/set_walk_in" => CommandOpcode::WalkIn,
        "/set_walk_in_time" => CommandOpcode::WalkInTime,
        _ => return None,
    };
    Some(opcode)
}

/// Value of `key` in an `application/x-www-form-urlencoded` string.
pub fn form_value<'b>(form: &'b str, key: &str) -> Option<&'b str> {
    form.split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value.trim())
}

/// Turn a form into a write command for `opcode`. Domain checks are left to
/// [`WriteCommand::validate`].
pub fn parse_form(opcode: CommandOpcode, form: &str) -> Result<WriteCommand, ValidationError> {
    let key = match opcode {
        CommandOpcode::FanSpeed => "speed",
        CommandOpcode::WalkIn => "state",
        _ => "value",
    };
    let raw = form_value(form, key).ok_or(ValidationError::MissingParameter(opcode))?;
    let invalid = ValidationError::InvalidValue(opcode);

    let argument = match opcode {
        CommandOpcode::FanSpeed => {
            let speed = FanSpeed::parse(raw).ok_or(invalid)?;
            return Ok(WriteCommand::fan_speed(speed));
        }
        CommandOpcode::WalkIn => match raw {
            "on" => Argument::Flag(true),
            "off" => Argument::Flag(false),
            _ => return Err(invalid),
        },
        _ => Argument::Value(raw.parse::<f32>().map_err(|_| invalid)?),
    };
    Ok(WriteCommand::new(opcode, argument))
}

/// Resolve a request. Write routes are parsed and validated here, so a
/// `Route::Write(Ok(_))` is ready for the gate.
pub fn route(method: Method, target: &str, body: &str) -> Route {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    match (method, path) {
        (Method::Get, "/data") => Route::Status,
        (Method::Post, path) => match write_opcode(path) {
            Some(opcode) => {
                let form = if body.is_empty() { query } else { body };
                Route::Write(parse_form(opcode, form).and_then(|command| {
                    command.validate()?;
                    Ok(command)
                }))
            }
            None => Route::NotFound,
        },
        _ => Route::NotFound,
    }
}

//==================================================================================RENDERING
fn write_number(out: &mut String<BODY_CAP>, value: f32) -> core::fmt::Result {
    if value.is_finite() {
        write!(out, "{:.2}", value)
    } else {
        out.push_str("null").map_err(|_| core::fmt::Error)
    }
}

fn status_body(report: &StatusReport) -> Result<String<BODY_CAP>, core::fmt::Error> {
    let r = &report.readings;
    let mut out = String::new();

    out.push_str("{\"outputVoltage\":").map_err(|_| core::fmt::Error)?;
    write_number(&mut out, r.output_voltage)?;
    out.push_str(",\"outputCurrent\":").map_err(|_| core::fmt::Error)?;
    write_number(&mut out, r.output_current)?;
    out.push_str(",\"outputCurrentLimit\":").map_err(|_| core::fmt::Error)?;
    write_number(&mut out, r.output_current_limit)?;
    out.push_str(",\"temperature\":").map_err(|_| core::fmt::Error)?;
    write_number(&mut out, r.temperature)?;
    out.push_str(",\"supplyVoltage\":").map_err(|_| core::fmt::Error)?;
    write_number(&mut out, r.supply_voltage)?;
    write!(
        out,
        ",\"isCommandPending\":{},\"remainingTime\":{}}}",
        report.command_pending, report.remaining_secs
    )?;
    Ok(out)
}

/// `GET /data` body.
pub fn status_reply(report: &StatusReport) -> HttpReply {
    match status_body(report) {
        Ok(body) => HttpReply {
            status: 200,
            content_type: CONTENT_JSON,
            body,
        },
        Err(_) => HttpReply::overflow(),
    }
}

fn ack_body(ack: &Ack) -> Result<String<BODY_CAP>, core::fmt::Error> {
    let mut out = String::new();
    let command = &ack.command;

    match (command.opcode, command.argument) {
        (CommandOpcode::FanSpeed, Argument::Flag(true)) => {
            write!(out, "Command sent: set fan to full speed")?
        }
        (CommandOpcode::FanSpeed, Argument::Flag(false)) => {
            write!(out, "Command sent: set fan to auto")?
        }
        (CommandOpcode::WalkIn, Argument::Flag(on)) => write!(
            out,
            "Command sent: set walk-in to {}",
            if on { "ON" } else { "OFF" }
        )?,
        (CommandOpcode::WalkInTime, Argument::Value(v)) => {
            write!(out, "Command sent: set walk-in time to {:.2}", v)?
        }
        (opcode, Argument::Value(v)) => write!(out, "Command sent: {} {:.2}", opcode.name(), v)?,
        (opcode, Argument::Flag(f)) => write!(out, "Command sent: {} {}", opcode.name(), f)?,
    }

    if let Some(secs) = ack.settling_secs {
        write!(out, ". Please wait {} seconds for confirmation.", secs)?;
    }
    Ok(out)
}

/// Reply for an accepted write.
pub fn ack_reply(ack: &Ack) -> HttpReply {
    match ack_body(ack) {
        Ok(body) => HttpReply {
            status: 200,
            content_type: CONTENT_TEXT,
            body,
        },
        Err(_) => HttpReply::overflow(),
    }
}

/// Reply for a refused write.
pub fn error_reply(err: &CommandError<()>) -> HttpReply {
    match err {
        CommandError::Validation(validation) => HttpReply::text(400, validation.message()),
        CommandError::Settling { remaining_secs } => {
            let mut body = String::new();
            match write!(
                body,
                "Command pending, please wait {} seconds.",
                remaining_secs
            ) {
                Ok(()) => HttpReply {
                    status: 409,
                    content_type: CONTENT_TEXT,
                    body,
                },
                Err(_) => HttpReply::overflow(),
            }
        }
        CommandError::Transport(()) => HttpReply::text(503, "Error sending command."),
    }
}

pub fn submit_reply(result: &SubmitResult) -> HttpReply {
    match result {
        Ok(ack) => ack_reply(ack),
        Err(err) => error_reply(err),
    }
}

pub fn not_found() -> HttpReply {
    HttpReply::text(404, "Not found")
}

/// Serve one request through the bridge.
pub async fn handle<const CAP: usize>(
    bridge: &mut BridgeHandle<'_, CAP>,
    method: Method,
    target: &str,
    body: &str,
) -> HttpReply {
    match route(method, target, body) {
        Route::Status => status_reply(&bridge.status().await),
        Route::Write(Ok(command)) => submit_reply(&bridge.submit(command).await),
        Route::Write(Err(err)) => {
            #[cfg(feature = "defmt")]
            defmt::info!("Rejected {}: {}", err.opcode(), err.message());
            error_reply(&CommandError::Validation(err))
        }
        Route::NotFound => not_found(),
    }
}
