pub struct DefaultsConfig {
    pub temp_start: f64,
    pub temp_end: f64,
    pub num_temp_steps: usize,
    pub dynamics_steps_per_temp: usize,
    pub time_step: f64,
    pub repulsion_distance: f64,
    pub init_radius: f64,
    pub num_models: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            temp_start: 500.0,
            temp_end: 1.0,
            num_temp_steps: 100,
            dynamics_steps_per_temp: 50,
            time_step: 0.01,
            repulsion_distance: 1.0,
            init_radius: 50.0,
            num_models: 1,
        }
    }
}
