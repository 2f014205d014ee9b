use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use clap::Parser;
use vrover_client::{run_client, ClientConfig, LinkRuntimeStats, SimTracker};
use vrover_common::env_bool;
use vrover_vr::TrackingSource;

#[derive(Parser, Debug)]
#[command(name = "vrover-client")]
struct Args {
    /// Control-link destination (robot UDP endpoint)
    #[arg(long, default_value = "192.168.1.239:5005")]
    connect: SocketAddr,
    /// Control loop rate; normally slaved to the headset refresh
    #[arg(long, default_value_t = 72)]
    tick_hz: u32,
    /// Joystick deadzone, normalized to [0, 0.95]
    #[arg(long, default_value_t = 0.1)]
    gamepad_deadzone: f32,
    /// Motor speed multiplier applied after mapping
    #[arg(long, default_value_t = 1.0)]
    speed_multiplier: f32,
    /// Disable gamepad capture
    #[arg(long, default_value_t = false)]
    no_gamepad: bool,
    /// Drive the head pose from a simulated tracker (bench runs without a
    /// headset; also VROVER_SIM_TRACKING=1)
    #[arg(long, default_value_t = false)]
    sim_tracking: bool,
}

fn main() -> anyhow::Result<()> {
    vrover_common::init_tracing();

    let args = Args::parse();
    let sim_tracking = args.sim_tracking || env_bool("VROVER_SIM_TRACKING", false);

    let tracking: Option<Arc<Mutex<dyn TrackingSource>>> = if sim_tracking {
        Some(Arc::new(Mutex::new(SimTracker::new())))
    } else {
        None
    };

    let config = ClientConfig {
        target: args.connect,
        tick_hz: args.tick_hz,
        speed_multiplier: args.speed_multiplier,
        gamepad_enabled: !args.no_gamepad,
        gamepad_deadzone: args.gamepad_deadzone,
        tracking,
        runtime_stats: Some(Arc::new(LinkRuntimeStats::default())),
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run_client(config))
}
