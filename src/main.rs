// ==============================================================================
// tarmac-sim — fixed-timestep demo runner
// ------------------------------------------------------------------------------
// Drives one car through a scripted launch/brake/corner cycle at 100 Hz and
// prints a telemetry line once per second. The tick clock lives out here on
// purpose: the core is tick-based and the caller owns the schedule.
// ==============================================================================

use std::time::Duration;

use log::info;
use tokio::time::interval;

use tarmac_physics::{Car, CarConfig, Environment};

const TICK: f32 = 0.01; // 100 Hz
const TICKS_PER_REPORT: u32 = 100;

/// Simple scripted driver: launch, brake, corner, repeat.
fn drive(car: &mut Car, t: f32) {
    let phase = t % 24.0;
    if phase < 8.0 {
        car.inputs.set_throttle(1.0);
        car.inputs.set_brake(0.0);
        car.inputs.set_steering(0.0);
    } else if phase < 12.0 {
        car.inputs.set_throttle(0.0);
        car.inputs.set_brake(0.8);
        car.inputs.set_steering(0.0);
    } else if phase < 18.0 {
        car.inputs.set_throttle(0.6);
        car.inputs.set_brake(0.0);
        car.inputs.set_steering(0.4);
    } else {
        car.inputs.set_throttle(0.5);
        car.inputs.set_brake(0.0);
        car.inputs.set_steering(-0.4);
    }

    // short-shift near the top of the band
    if car.rpm() > car.engine.shift_rpm && !car.transmission.is_shifting() {
        car.shift_up();
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut car = Car::new(CarConfig::gt86()).expect("preset config is valid");
    car.request_gear(1);
    let env = Environment::default();

    info!("tarmac-sim running at {} Hz", (1.0 / TICK) as u32);

    let mut ticker = interval(Duration::from_millis((TICK * 1000.0) as u64));
    let mut tick: u32 = 0;

    loop {
        ticker.tick().await;

        let t = tick as f32 * TICK;
        drive(&mut car, t);
        car.update_physics(TICK, &env);

        tick += 1;
        if tick % TICKS_PER_REPORT == 0 {
            let snapshot = car.telemetry();
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{line}"),
                Err(err) => log::warn!("telemetry serialization failed: {err}"),
            }
        }
    }
}
