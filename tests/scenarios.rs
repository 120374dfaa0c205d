// End-to-end scenario coverage: whole-car behavior over simulated seconds,
// driven only through the public input/telemetry surface.

use tarmac_physics::{Car, CarConfig, DriveMode, Environment};

const DT: f32 = 0.01;

fn staged_car() -> Car {
    let mut car = Car::new(CarConfig::gt86()).expect("preset is valid");
    car.request_gear(1);
    // let the shift finish and the suspension settle before the clock starts
    let env = Environment::default();
    for _ in 0..100 {
        car.update_physics(DT, &env);
    }
    car
}

fn forward_speed(car: &Car) -> f32 {
    car.body.velocity.dot(&car.body.forward())
}

/// Upshift like a driver would; the GT86 preset has a manual box.
fn shift_if_needed(car: &mut Car) {
    if car.rpm() > car.engine.shift_rpm && !car.transmission.is_shifting() {
        car.shift_up();
    }
}

#[test]
fn standing_start_accelerates_cleanly() {
    let mut car = staged_car();
    let env = Environment::default();
    car.inputs.set_throttle(1.0);

    let mut last = forward_speed(&car);
    for tick in 0..500 {
        shift_if_needed(&mut car);
        car.update_physics(DT, &env);

        let rpm = car.rpm();
        assert!(
            rpm >= car.engine.idle_rpm && rpm <= car.engine.redline_rpm,
            "rpm {rpm} out of band at tick {tick}"
        );

        let now = forward_speed(&car);
        if tick < 100 {
            assert!(now > last, "speed stalled at tick {tick}: {last} -> {now}");
        }
        last = now;
    }

    assert!(car.speed_kmh() > 40.0, "only reached {} km/h", car.speed_kmh());
}

#[test]
fn full_brake_stop_heats_discs_then_cools() {
    let mut car = staged_car();
    let env = Environment::default();

    // build speed to roughly 100 km/h
    car.inputs.set_throttle(1.0);
    for _ in 0..2000 {
        shift_if_needed(&mut car);
        car.update_physics(DT, &env);
        if car.speed_kmh() >= 100.0 {
            break;
        }
    }
    assert!(car.speed_kmh() > 90.0, "launch only reached {}", car.speed_kmh());

    car.inputs.set_throttle(0.0);
    car.inputs.set_brake(1.0);

    let start_temps = car.brakes.disc_temp;
    let mut last_speed = car.speed();
    let mut last_temps = start_temps;
    for tick in 0..1000 {
        car.update_physics(DT, &env);

        let speed = car.speed();
        assert!(speed <= last_speed + 1e-4, "speed rose under braking at {tick}");
        last_speed = speed;

        // discs heat monotonically during the first stretch of the stop
        if tick < 150 {
            assert!(car.brakes.disc_temp[0] >= last_temps[0] - 1e-3);
            assert!(car.brakes.disc_temp[1] >= last_temps[1] - 1e-3);
        }
        last_temps = car.brakes.disc_temp;
    }
    assert!(car.speed() < 1.0, "still moving at {}", car.speed());
    assert!(car.brakes.disc_temp[0] > start_temps[0]);
    assert!(car.brakes.disc_temp[1] > start_temps[1]);

    // pedal released: cooling dominates
    car.inputs.set_brake(0.0);
    let peak = car.brakes.disc_temp;
    for _ in 0..2000 {
        car.update_physics(DT, &env);
    }
    assert!(car.brakes.disc_temp[0] < peak[0]);
    assert!(car.brakes.disc_temp[1] < peak[1]);
}

#[test]
fn running_dry_kills_drive_within_the_tick() {
    let mut car = staged_car();
    let env = Environment::default();

    car.inputs.set_throttle(1.0);
    for _ in 0..300 {
        car.update_physics(DT, &env);
    }
    let cruising = forward_speed(&car);
    assert!(cruising > 3.0);

    // tank runs dry while the pedal stays floored
    car.set_fuel(0.0);
    car.update_physics(DT, &env);
    let after_one_tick = forward_speed(&car);
    // nothing is pushing anymore: the very next tick already loses speed
    assert!(after_one_tick <= cruising, "{after_one_tick} > {cruising}");

    for _ in 0..300 {
        car.update_physics(DT, &env);
    }
    assert!(forward_speed(&car) < after_one_tick, "car kept driving on an empty tank");
    assert_eq!(car.telemetry().fuel, 0.0);
}

#[test]
fn esc_off_leaves_a_slide_uncorrected() {
    // same provocation twice; the Off car must see zero intervention flags
    let env = Environment::new(0.5, 20.0, Default::default());

    let run = |mode: DriveMode| {
        let mut car = Car::new(CarConfig::gt86()).expect("preset is valid");
        car.set_drive_mode(mode);
        car.request_gear(1);
        let mut activations = 0u32;
        for _ in 0..100 {
            car.update_physics(DT, &env);
        }
        car.inputs.set_throttle(1.0);
        for tick in 0..600 {
            if tick == 200 {
                car.inputs.set_steering(0.9);
            }
            car.update_physics(DT, &env);
            if car.esc.esc_active || car.esc.tcs_active || car.esc.abs_active {
                activations += 1;
            }
        }
        activations
    };

    assert_eq!(run(DriveMode::Off), 0);
}

#[test]
fn low_traction_surface_slows_the_launch() {
    let dry = Environment::default();
    let ice = Environment::new(0.25, 5.0, Default::default());

    let launch = |env: &Environment| {
        let mut car = staged_car();
        car.inputs.set_throttle(1.0);
        for _ in 0..400 {
            car.update_physics(DT, env);
        }
        forward_speed(&car)
    };

    let dry_speed = launch(&dry);
    let ice_speed = launch(&ice);
    assert!(
        ice_speed < dry_speed,
        "ice launch ({ice_speed}) should trail dry launch ({dry_speed})"
    );
}

#[test]
fn telemetry_snapshot_serializes() {
    let mut car = staged_car();
    car.inputs.set_throttle(0.5);
    car.update_physics(DT, &Environment::default());

    let line = serde_json::to_string(&car.telemetry()).expect("snapshot serializes");
    assert!(line.contains("\"speed_kmh\""));
    assert!(line.contains("\"tire_temp\""));
    assert!(line.contains("\"esc_active\""));
}

#[test]
fn a_long_stint_stays_finite_and_wears_the_car() {
    let mut car = staged_car();
    let env = Environment::default();

    // two minutes of hard cycling between full throttle and full brake
    for tick in 0..12_000 {
        let phase = tick % 800;
        if phase < 500 {
            car.inputs.set_throttle(1.0);
            car.inputs.set_brake(0.0);
        } else {
            car.inputs.set_throttle(0.0);
            car.inputs.set_brake(1.0);
        }
        shift_if_needed(&mut car);
        car.update_physics(DT, &env);

        assert!(car.body.position.x.is_finite());
        assert!(car.body.velocity.magnitude().is_finite());
    }

    let t = car.telemetry();
    assert!(t.fuel < 1.0, "fuel never burned");
    assert!(t.tire_wear.iter().any(|w| *w > 0.0), "tires never wore");
    assert!(t.brake_temp_front > env.ambient_temp);
}
