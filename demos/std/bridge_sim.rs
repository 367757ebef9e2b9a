//! Host-side walkthrough: the bridge drives a simulated R48 over an
//! in-memory bus while a scripted operator goes through the web endpoints.
//!
//! The simulated rectifier answers read requests from its own state and
//! applies voltage writes, so the effect of a command shows up in `/data`
//! once the settling window has elapsed.

use r48_can_bridge::{
    config::BridgeConfig,
    core::Measurement,
    infra::codec::float,
    protocol::{
        control::supervisor::{BridgeChannels, BridgeService},
        frames::{builder::response_frame, READ_PREFIX, WRITE_PREFIX},
        transport::{
            can_frame::CanFrame,
            traits::{bridge_timer::BridgeTimer, can_bus::CanBus, clock::EmbassyClock},
        },
        web::{handle, Method},
    },
};
use static_cell::StaticCell;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::{sleep, Duration};

static CHANNELS: StaticCell<BridgeChannels<4>> = StaticCell::new();

/// One end of an in-memory CAN segment.
struct SimBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: mpsc::UnboundedReceiver<CanFrame>,
}

fn segment() -> (SimBus, SimBus) {
    let (a_tx, b_rx) = mpsc::unbounded_channel();
    let (b_tx, a_rx) = mpsc::unbounded_channel();
    (SimBus { tx: a_tx, rx: a_rx }, SimBus { tx: b_tx, rx: b_rx })
}

impl CanBus for SimBus {
    type Error = ();

    async fn start<'a>(&'a mut self, bitrate: u32) -> Result<(), Self::Error> {
        println!("[bus] controller started at {} bit/s", bitrate);
        Ok(())
    }

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        self.tx.send(*frame).map_err(|_| ())
    }

    fn try_recv(&mut self) -> Result<Option<CanFrame>, Self::Error> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(()),
        }
    }
}

struct TokioTimer;

impl BridgeTimer for TokioTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}

/// Rectifier side of the segment.
async fn rectifier(mut bus: SimBus, config: BridgeConfig) {
    let mut readings = [53.5f32, 8.2, 1.0, 29.0, 231.0];

    while let Some(frame) = bus.rx.recv().await {
        if frame.data[..3] == READ_PREFIX {
            let Some(measurement) = Measurement::from_code(frame.data[3]) else {
                continue;
            };
            let value = readings[measurement.code() as usize - 1];
            if bus.send(&response_frame(measurement, value, &config)).await.is_err() {
                return;
            }
        } else if frame.data[..3] == WRITE_PREFIX {
            println!("[r48] write opcode {:#04x} data {:02x?}", frame.data[3], &frame.data[4..]);
            // Online (0x21) and permanent (0x24) output voltage.
            if matches!(frame.data[3], 0x21 | 0x24) {
                if let Some(volts) = float::decode_at(&frame.data, 4) {
                    readings[0] = volts;
                }
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== R48 bridge simulation ===\n");

    let config = BridgeConfig::new()
        .with_poll_interval_ms(500)
        .with_settling_ms(2_000);
    let (bridge_bus, rectifier_bus) = segment();

    let service = match BridgeService::start(
        bridge_bus,
        EmbassyClock,
        TokioTimer,
        config,
        CHANNELS.init(BridgeChannels::new()),
    )
    .await
    {
        Ok(service) => service,
        Err(err) => {
            eprintln!("bring-up failed: {}", err);
            return;
        }
    };
    let (mut bridge, runner) = service.into_parts();

    let operator = async {
        let script: [(Method, &str, &str); 6] = [
            (Method::Get, "/data", ""),
            (Method::Post, "/set_perm_v", "value=52.5"),
            (Method::Post, "/set_online_c", "value=0.8"),
            (Method::Get, "/data", ""),
            (Method::Post, "/set_diesel_input_c", "value=20"),
            (Method::Post, "/set_fan_speed", "speed=turbo"),
        ];

        sleep(Duration::from_millis(200)).await;
        for (method, path, body) in script {
            let reply = handle(&mut bridge, method, path, body).await;
            println!("{:?} {} {} -> {} {}", method, path, body, reply.status, reply.body);
            sleep(Duration::from_millis(300)).await;
        }

        println!("\nWaiting for the settling window...");
        sleep(Duration::from_millis(2_500)).await;
        let reply = handle(&mut bridge, Method::Get, "/data", "").await;
        println!("GET /data -> {} {}", reply.status, reply.body);
    };

    tokio::select! {
        result = runner.drive() => println!("runner stopped: {:?}", result),
        _ = rectifier(rectifier_bus, config) => println!("rectifier went away"),
        _ = operator => println!("\n=== done ==="),
    }
}
