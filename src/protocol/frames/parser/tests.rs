//! Tests for response decoding and state updates.
use super::*;

fn response(code: u8, value: f32) -> CanFrame {
    let bytes = float::encode(value);
    CanFrame::new(
        CanId::RESPONSE,
        [0x41, 0xF0, 0x00, code, bytes[0], bytes[1], bytes[2], bytes[3]],
    )
}

#[test]
/// Output voltage answer updates that field only.
fn test_ingest_output_voltage() {
    let mut state = DeviceState::new();
    let frame = CanFrame::new(
        CanId::RESPONSE,
        [0x41, 0xF0, 0x00, 0x01, 0x42, 0x52, 0x00, 0x00],
    );

    let reading = ingest(&mut state, &frame, CanId::RESPONSE).unwrap();
    assert_eq!(reading.measurement, Measurement::OutputVoltage);

    let snapshot = state.snapshot();
    assert_eq!(snapshot.output_voltage, 52.5);
    assert_eq!(snapshot.output_current, 0.0);
    assert_eq!(snapshot.output_current_limit, 0.0);
    assert_eq!(snapshot.temperature, 0.0);
    assert_eq!(snapshot.supply_voltage, 0.0);
}

#[test]
/// Each measurement code lands in its own field.
fn test_ingest_every_measurement() {
    let mut state = DeviceState::new();
    let values = [53.2, 12.5, 0.8, 41.0, 230.4];
    for (measurement, value) in Measurement::ALL.iter().zip(values) {
        ingest(&mut state, &response(measurement.code(), value), CanId::RESPONSE).unwrap();
    }
    for (measurement, value) in Measurement::ALL.iter().zip(values) {
        assert_eq!(state.get(*measurement), value);
    }
}

#[test]
/// Unknown code: reported with its value, state unchanged.
fn test_unknown_measurement_leaves_state() {
    let mut state = DeviceState::new();
    ingest(&mut state, &response(0x01, 48.0), CanId::RESPONSE).unwrap();
    let before = state.snapshot();

    let err = ingest(&mut state, &response(0xFF, 7.0), CanId::RESPONSE).unwrap_err();
    assert_eq!(err, FrameError::UnknownMeasurement { code: 0xFF, value: 7.0 });
    assert_eq!(state.snapshot(), before);
}

#[test]
/// Foreign identifiers are refused, including our own command traffic.
fn test_rejects_other_identifiers() {
    let mut frame = response(0x01, 48.0);
    frame.id = CanId::COMMAND;
    assert!(matches!(
        decode_response(&frame, CanId::RESPONSE),
        Err(FrameError::UnexpectedId { id: 0x0608_0783 })
    ));
}

#[test]
/// Short frames and wrong prefixes are refused.
fn test_rejects_malformed_payloads() {
    let mut short = response(0x01, 48.0);
    short.len = 7;
    assert_eq!(
        decode_response(&short, CanId::RESPONSE),
        Err(FrameError::InvalidDataLen { len: 7 })
    );

    let mut echo = response(0x01, 48.0);
    echo.data[0] = 0x01;
    assert_eq!(
        decode_response(&echo, CanId::RESPONSE),
        Err(FrameError::UnexpectedPrefix)
    );

    let mut state = DeviceState::new();
    assert!(ingest(&mut state, &echo, CanId::RESPONSE).is_err());
    assert_eq!(state.snapshot(), DeviceState::new().snapshot());
}
