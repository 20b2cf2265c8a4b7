use log::debug;

use crate::constants::ClockConfig;

#[derive(Clone, Debug)]
pub struct FrameClock {
    config: ClockConfig,
    last_ms: Option<f64>,
    // 0 pauses the simulation without building up a backlog
    pub time_scale: f64,
}

impl FrameClock {
    pub fn new(config: ClockConfig) -> FrameClock {
        FrameClock {
            config,
            last_ms: None,
            time_scale: 1.0,
        }
    }

    // the first call only starts the clock
    pub fn advance(&mut self, now_ms: f64) -> Vec<f64> {
        let mut last = self.last_ms.unwrap_or(now_ms);
        if last < now_ms - self.config.max_backlog_ms {
            debug!("dropping {:.1} ms of backlog", now_ms - self.config.max_backlog_ms - last);
            last = now_ms - self.config.max_backlog_ms;
        }
        let mut steps = Vec::new();
        while last < now_ms {
            let next = (last + self.config.max_step_ms).min(now_ms);
            steps.push((next - last) * 0.001 * self.time_scale);
            last = next;
        }
        self.last_ms = Some(last);
        if self.time_scale == 0.0 {
            steps.clear();
        }
        steps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        FrameClock::new(ClockConfig::default())
    }
}
