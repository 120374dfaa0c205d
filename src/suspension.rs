// ==============================================================================
// suspension.rs — SPRING/DAMPER TRAVEL + ANTI-ROLL LOAD TRANSFER
// ------------------------------------------------------------------------------
// Owns all suspension state for the four corners. Each tick the orchestrator
// hands in the per-wheel vertical loads; travel relaxes toward load/spring,
// the damper acts on the travel rate, and the anti-roll bars shift force
// across each axle in proportion to the left/right travel difference.
// Anti-roll bars redistribute force, they never create net vertical force.
// ==============================================================================

use crate::tire::{WheelPos, WHEEL_POSITIONS};

const TRAVEL_RESPONSE: f32 = 18.0; // 1/s, how fast travel tracks the load
const DAMPER_CLAMP: f32 = 0.6; // damper force limited to this share of spring

#[derive(Debug, Clone)]
pub struct SuspensionSystem {
    pub spring_rate: [f32; 4], // N/m
    pub damper_rate: [f32; 4], // N*s/m
    pub anti_roll: [f32; 2],   // N/m, front/rear bar
    pub max_travel: f32,       // m

    travel: [f32; 4], // m, 0 = fully extended
    force: [f32; 4],  // N, last computed output
}

impl SuspensionSystem {
    pub fn new(spring_rate: f32, damper_rate: f32, max_travel: f32) -> Self {
        let k = spring_rate.clamp(10_000.0, 200_000.0);
        let c = damper_rate.clamp(500.0, 20_000.0);
        Self {
            spring_rate: [k; 4],
            damper_rate: [c; 4],
            anti_roll: [15_000.0, 10_000.0],
            max_travel: max_travel.clamp(0.05, 0.35),
            travel: [0.0; 4],
            force: [0.0; 4],
        }
    }

    /// Spring rate and damping derived from static sag, one natural way to
    /// tune a corner: k = F/sag, c = 2*zeta*sqrt(k*m).
    pub fn from_sag(corner_mass: f32, sag: f32, zeta: f32) -> Self {
        let f_static = corner_mass.max(50.0) * crate::math::GRAVITY;
        let k = f_static / sag.max(1e-3);
        let c = 2.0 * zeta.clamp(0.2, 1.2) * (k * corner_mass.max(50.0)).sqrt();
        Self::new(k, c, 0.18)
    }

    #[inline]
    pub fn travel(&self, pos: WheelPos) -> f32 {
        self.travel[pos.index()]
    }

    /// Travel as a fraction of the physical range, for telemetry.
    pub fn travel_fractions(&self) -> [f32; 4] {
        WHEEL_POSITIONS.map(|p| (self.travel[p.index()] / self.max_travel).clamp(0.0, 1.0))
    }

    #[inline]
    pub fn forces(&self) -> [f32; 4] {
        self.force
    }

    /// Relax travel toward the commanded loads and return the per-wheel
    /// spring+damper force. Loads are N, non-negative.
    pub fn update(&mut self, loads: [f32; 4], dt: f32) -> [f32; 4] {
        for i in 0..4 {
            let target = (loads[i].max(0.0) / self.spring_rate[i]).clamp(0.0, self.max_travel);
            let previous = self.travel[i];
            let step = (target - previous) * (1.0 - (-TRAVEL_RESPONSE * dt).exp());
            self.travel[i] = (previous + step).clamp(0.0, self.max_travel);

            let travel_vel = if dt > 0.0 { (self.travel[i] - previous) / dt } else { 0.0 };
            let spring = self.spring_rate[i] * self.travel[i];
            let damper =
                (self.damper_rate[i] * travel_vel).clamp(-spring * DAMPER_CLAMP, spring * DAMPER_CLAMP);
            self.force[i] = (spring + damper).max(0.0);
        }

        // anti-roll bars: transfer proportional to the travel delta
        for (bar, left, right) in [
            (0usize, WheelPos::Fl, WheelPos::Fr),
            (1usize, WheelPos::Rl, WheelPos::Rr),
        ] {
            let (l, r) = (left.index(), right.index());
            let delta = self.travel[l] - self.travel[r];
            if delta.abs() < 1e-4 {
                continue;
            }
            let transfer = self.anti_roll[bar] * delta;
            // keep both corners non-negative after the transfer
            let transfer = transfer.clamp(-self.force[r].max(0.0), self.force[l].max(0.0));
            self.force[l] -= transfer;
            self.force[r] += transfer;
        }

        self.force
    }
}
