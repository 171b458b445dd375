use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    #[serde(default = "default_true")]
    pub strong_compatibility: bool,
    #[serde(default = "default_true")]
    pub weak_compatibility: bool,
    #[serde(default = "default_true")]
    pub remove_invalid_ports: bool,
    #[serde(default = "default_true")]
    pub report_adjacency: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strong_compatibility: default_true(),
            weak_compatibility: default_true(),
            remove_invalid_ports: default_true(),
            report_adjacency: default_true(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratorConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_droplets")]
    pub droplets: usize,
    #[serde(default = "default_max_route_length")]
    pub max_route_length: usize,
    #[serde(default = "default_spawn_window")]
    pub spawn_window: u32,
    #[serde(default = "default_mixers")]
    pub mixers: usize,
    #[serde(default = "default_blockages")]
    pub blockages: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            droplets: default_droplets(),
            max_route_length: default_max_route_length(),
            spawn_window: default_spawn_window(),
            mixers: default_mixers(),
            blockages: default_blockages(),
            seed: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_width() -> i32 {
    12
}

fn default_height() -> i32 {
    12
}

fn default_droplets() -> usize {
    6
}

fn default_max_route_length() -> usize {
    10
}

fn default_spawn_window() -> u32 {
    4
}

fn default_mixers() -> usize {
    1
}

fn default_blockages() -> usize {
    1
}
