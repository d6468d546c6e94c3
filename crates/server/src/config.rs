use skirmish::DEFAULT_TICK_RATE;

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub tick_rate: u32,
    pub client_peers: u16,
    pub run_ticks: u64,
    pub sync_interval: u32,
    pub loss_percent: f32,
    pub realtime: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            client_peers: 2,
            run_ticks: 600,
            sync_interval: 3,
            loss_percent: 0.0,
            realtime: false,
        }
    }
}
