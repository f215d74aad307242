use std::path::Path;

use serde::{Deserialize, Serialize};

use dystopia_core::Millis;

/// RGB triple consumed by the renderer.
pub type Rgb = [u8; 3];

/// Error raised while reading a runner config file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
            Self::Invalid(m) => write!(f, "invalid config: {m}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

/// Visible world bounds. Screen space, y grows downward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Y coordinate of the ground plane (top of the ground strip).
    pub ground_y: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            ground_y: 700.0,
        }
    }
}

/// Player movement and body parameters. Velocities are per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub squat_height: f32,
    pub start_x: f32,
    pub speed: f32,
    pub squat_speed: f32,
    /// Initial vertical velocity of a jump (negative is upward).
    pub jump_velocity: f32,
    /// Fraction of the jump velocity applied by the double jump.
    pub double_jump_factor: f32,
    pub gravity: f32,
    pub initial_health: u8,
    pub invulnerability_ticks: u32,
    /// Maximum body tilt in degrees.
    pub tilt_max: f32,
    pub wobble_speed: f32,
    pub particle_count: u32,
    pub particle_lifetime_ticks: u32,
    pub particle_speed_min: f32,
    pub particle_speed_max: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 80.0,
            height: 80.0,
            squat_height: 50.0,
            start_x: 300.0,
            speed: 5.0,
            squat_speed: 3.0,
            jump_velocity: -15.0,
            double_jump_factor: 0.8,
            gravity: 0.8,
            initial_health: 3,
            invulnerability_ticks: 60,
            tilt_max: 15.0,
            wobble_speed: 0.05,
            particle_count: 10,
            particle_lifetime_ticks: 30,
            particle_speed_min: 2.0,
            particle_speed_max: 5.0,
        }
    }
}

/// Pickup sizing and power-up strength.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub speed_multiplier: f32,
    pub jump_multiplier: f32,
    pub duration_ms: Millis,
    pub pickup_size: f32,
    /// Gap between a pickup's bottom edge and its platform.
    pub hover_gap: f32,
    /// Celebration bursts spawned on activation.
    pub celebration_bursts: u32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.8,
            jump_multiplier: 1.5,
            duration_ms: 5_000,
            pickup_size: 25.0,
            hover_gap: 20.0,
            celebration_bursts: 20,
        }
    }
}

/// Player projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaserConfig {
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub cooldown_ms: Millis,
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            speed: 15.0,
            width: 20.0,
            height: 5.0,
            cooldown_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub height: f32,
    pub min_width: u32,
    pub max_width: u32,
    pub min_gap: u32,
    pub max_gap: u32,
    /// Highest platform top sits this far above the ground.
    pub height_variance: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            height: 20.0,
            min_width: 60,
            max_width: 200,
            min_gap: 100,
            max_gap: 300,
            height_variance: 100,
        }
    }
}

/// Chunk generation probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub obstacle_chance: f64,
    pub pickup_chance: f64,
    /// Horizontal span covered by one chunk, starting at the right edge of
    /// the visible world.
    pub chunk_length: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            obstacle_chance: 0.5,
            pickup_chance: 0.3,
            chunk_length: 1200.0,
        }
    }
}

/// Size and damage of one obstacle kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObstacleDims {
    pub width: f32,
    pub height: f32,
    pub damage: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub spike: ObstacleDims,
    pub laser: ObstacleDims,
    pub drone: ObstacleDims,
    pub drone_amplitude: f32,
    pub drone_phase_step: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            spike: ObstacleDims {
                width: 50.0,
                height: 50.0,
                damage: 1,
            },
            laser: ObstacleDims {
                width: 10.0,
                height: 100.0,
                damage: 2,
            },
            drone: ObstacleDims {
                width: 50.0,
                height: 50.0,
                damage: 1,
            },
            drone_amplitude: 50.0,
            drone_phase_step: 0.05,
        }
    }
}

/// Cat enemy behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    pub patrol_speed: f32,
    pub acceleration: f32,
    pub max_speed: f32,
    pub jump_velocity: f32,
    /// The cat jumps when the player is more than this far above it.
    pub jump_trigger_height: f32,
    pub jump_cooldown_ms: Millis,
    pub detection_range: f32,
    pub spawn_interval_ms: Millis,
    /// Spawn distance past the right edge of the world.
    pub spawn_offset: f32,
    pub taunt_chance: f64,
    pub taunt_cooldown_ms: Millis,
    /// Ticks between animation frames.
    pub frame_delay: u32,
    pub taunts: Vec<String>,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 80.0,
            patrol_speed: 2.0,
            acceleration: 0.1,
            max_speed: 4.0,
            jump_velocity: -12.0,
            jump_trigger_height: 50.0,
            jump_cooldown_ms: 1_000,
            detection_range: 300.0,
            spawn_interval_ms: 5_000,
            spawn_offset: 50.0,
            taunt_chance: 0.02,
            taunt_cooldown_ms: 4_000,
            frame_delay: 3,
            taunts: strings(&[
                "Mmm... cheese and human, my favorite!",
                "Here kitty kitty... Oh wait, I'M the kitty!",
                "Your cheese belongs to me now!",
                "Running makes you tastier!",
                "I can smell your fear... and cheese!",
                "Time for a cheese sandwich... with YOU in it!",
                "You can't outrun a hungry cat forever!",
                "That cheese would go great with some running human!",
                "Purrfect timing for lunch!",
                "Fast food? More like fast human!",
            ]),
        }
    }
}

/// World scroll speed, in pixels per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub base_speed: f32,
    /// Speed added per tick.
    pub drift_per_tick: f32,
    /// Multiplier applied on every level change.
    pub level_scale: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            base_speed: 3.0,
            drift_per_tick: 0.1 / 60.0,
            level_scale: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub per_tick: u64,
    pub enemy_elimination: u64,
    pub obstacle_elimination: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            per_tick: 1,
            enemy_elimination: 150,
            obstacle_elimination: 75,
        }
    }
}

/// On-screen message timing and overlay effects. Frame counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub duration_ticks: u32,
    pub fade_ticks: u32,
    pub announcement_ticks: u32,
    pub pause_alpha_step: u8,
    pub pause_alpha_max: u8,
    /// Theme colors close this many 1/255ths of the gap per tick.
    pub theme_transition_speed: f32,
    pub cheat_code: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            duration_ticks: 120,
            fade_ticks: 30,
            announcement_ticks: 180,
            pause_alpha_step: 10,
            pause_alpha_max: 180,
            theme_transition_speed: 5.0,
            cheat_code: "HuggyB".to_string(),
        }
    }
}

/// Color set applied to the scene for one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub background: Rgb,
    pub ground: Rgb,
    pub platform: Rgb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u8,
    pub name: String,
    pub score_required: u64,
    pub theme: Theme,
    /// Announcement text; the level name is shown when empty.
    #[serde(default)]
    pub message: String,
}

impl LevelConfig {
    pub fn announcement(&self) -> &str {
        if self.message.is_empty() {
            &self.name
        } else {
            &self.message
        }
    }
}

/// A scripted boss tied to one level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterConfig {
    pub name: String,
    pub level: u8,
    /// Level entered when the boss is defeated.
    pub advance_to: u8,
    pub center: (f32, f32),
    pub amplitude: (f32, f32),
    pub phase_step: f32,
    pub width: f32,
    pub height: f32,
    pub health: u8,
    pub hit_score: u64,
    pub defeat_bonus: u64,
    pub taunt_interval_ms: Millis,
    pub taunt_ticks: u32,
    pub defeat_message_ticks: u32,
    pub flash_ticks: u32,
    pub taunts: Vec<String>,
    pub defeat_messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub power_ups: PowerUpConfig,
    pub laser: LaserConfig,
    pub platforms: PlatformConfig,
    pub generation: GenerationConfig,
    pub obstacles: ObstacleConfig,
    pub enemy: EnemyConfig,
    pub scroll: ScrollConfig,
    pub scoring: ScoringConfig,
    pub messages: MessageConfig,
    pub levels: Vec<LevelConfig>,
    pub encounters: Vec<EncounterConfig>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            power_ups: PowerUpConfig::default(),
            laser: LaserConfig::default(),
            platforms: PlatformConfig::default(),
            generation: GenerationConfig::default(),
            obstacles: ObstacleConfig::default(),
            enemy: EnemyConfig::default(),
            scroll: ScrollConfig::default(),
            scoring: ScoringConfig::default(),
            messages: MessageConfig::default(),
            levels: default_levels(),
            encounters: default_encounters(),
        }
    }
}

impl RunnerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load config from `$DYSTOPIA_RUNNER_CONFIG` or `config/runner.toml`,
    /// falling back to defaults.
    pub fn load() -> Self {
        let path = std::env::var("DYSTOPIA_RUNNER_CONFIG")
            .unwrap_or_else(|_| "config/runner.toml".to_string());
        if !Path::new(&path).exists() {
            return Self::default();
        }
        match Self::from_path(&path) {
            Ok(cfg) => {
                tracing::info!("Loaded runner configuration from {path}");
                cfg
            },
            Err(e) => {
                tracing::warn!("{path}: {e}, using defaults");
                Self::default()
            },
        }
    }

    /// Structural checks the simulation relies on. Level 1 must exist at
    /// score zero, level ids must be unique and every encounter must point at
    /// known levels. Generation must advance and sampled ranges must be
    /// non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid("at least one level is required".into()));
        }
        if !self
            .levels
            .iter()
            .any(|l| l.id == 1 && l.score_required == 0)
        {
            return Err(ConfigError::Invalid(
                "level 1 with score_required = 0 is required".into(),
            ));
        }
        for (i, level) in self.levels.iter().enumerate() {
            if self.levels[..i].iter().any(|l| l.id == level.id) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate level id {}",
                    level.id
                )));
            }
        }
        for enc in &self.encounters {
            if self.level(enc.level).is_none() || self.level(enc.advance_to).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "encounter {} references an unknown level",
                    enc.name
                )));
            }
            if enc.health == 0 {
                return Err(ConfigError::Invalid(format!(
                    "encounter {} needs health > 0",
                    enc.name
                )));
            }
        }
        if self.platforms.min_width > self.platforms.max_width
            || self.platforms.min_gap > self.platforms.max_gap
        {
            return Err(ConfigError::Invalid(
                "platform min values must not exceed max values".into(),
            ));
        }
        if self.platforms.min_width.saturating_add(self.platforms.min_gap) == 0 {
            return Err(ConfigError::Invalid(
                "platform min_width + min_gap must be positive".into(),
            ));
        }
        let (speed_min, speed_max) = (
            self.player.particle_speed_min,
            self.player.particle_speed_max,
        );
        if speed_min.is_nan() || speed_max.is_nan() || speed_min > speed_max {
            return Err(ConfigError::Invalid(
                "particle_speed_min must not exceed particle_speed_max".into(),
            ));
        }
        Ok(())
    }

    pub fn level(&self, id: u8) -> Option<&LevelConfig> {
        self.levels.iter().find(|l| l.id == id)
    }
}

/// Optional presentation features resolved once by the host from the asset
/// provider. Only cosmetic state depends on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Number of animation frames available for the cat sprite.
    pub enemy_frames: u32,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { enemy_frames: 1 }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn level(id: u8, name: &str, score_required: u64, theme: [Rgb; 3], message: &str) -> LevelConfig {
    LevelConfig {
        id,
        name: name.to_string(),
        score_required,
        theme: Theme {
            background: theme[0],
            ground: theme[1],
            platform: theme[2],
        },
        message: message.to_string(),
    }
}

fn default_levels() -> Vec<LevelConfig> {
    vec![
        level(
            1,
            "Dystopian City",
            0,
            [[40, 42, 54], [70, 72, 84], [100, 102, 114]],
            "Welcome to Dystopian City!",
        ),
        level(
            2,
            "Neon District",
            1_000,
            [[25, 0, 51], [51, 0, 102], [128, 0, 255]],
            "",
        ),
        level(
            3,
            "Cyber Zone",
            2_500,
            [[0, 20, 40], [0, 40, 80], [0, 128, 255]],
            "",
        ),
        level(
            4,
            "Digital Wasteland",
            5_000,
            [[40, 0, 0], [80, 0, 0], [255, 0, 0]],
            "",
        ),
        level(
            5,
            "Matrix Core",
            7_500,
            [[0, 20, 0], [0, 40, 0], [0, 255, 0]],
            "",
        ),
        level(
            6,
            "Dalbird's Domain",
            10_000,
            [[30, 0, 30], [60, 0, 60], [120, 0, 120]],
            "",
        ),
        level(
            7,
            "Victory Zone",
            12_500,
            [[50, 50, 150], [100, 200, 100], [200, 200, 255]],
            "",
        ),
    ]
}

fn default_encounters() -> Vec<EncounterConfig> {
    let messages = MessageConfig::default();
    vec![
        EncounterConfig {
            name: "Catlock".to_string(),
            level: 4,
            advance_to: 5,
            center: (600.0, 200.0),
            amplitude: (150.0, 75.0),
            phase_step: 0.02,
            width: 250.0,
            height: 200.0,
            health: 3,
            hit_score: 150,
            defeat_bonus: 1_000,
            taunt_interval_ms: 4_000,
            taunt_ticks: messages.duration_ticks * 3 / 2,
            defeat_message_ticks: messages.duration_ticks * 2,
            flash_ticks: 30,
            taunts: strings(&[
                "According to Article Paw, Section Meow of the Catsitution...",
                "By Feline Law 4.2.0, all mice belong to cats!",
                "The Supreme Cat Court ruled in Whiskers v. Paws that naps are mandatory!",
                "As per the Catsitution, all boxes are cat property!",
                "The Feline Rights Act of 1876 declares all laps as cat seats!",
                "By Pawcedural Law, treats must be given on demand!",
                "The Cat Congress passed the Mandatory Petting Act!",
                "Under Kitty Common Law, birds behind windows are fair game!",
                "The Department of Feline Justice requires hourly snacks!",
                "The Catsitutional Amendment protects the right to knock things off tables!",
                "By Federal Feline Regulation, all yarn is contraband!",
                "The National Cat Agency has declared lasers as weapons of mass distraction!",
                "The Bureau of Feline Affairs states all dogs must be chased!",
                "As per the Catsitution, resistance to belly rubs is futile!",
                "The Cat Supreme Court ruled in favor of 3AM zoomies!",
            ]),
            defeat_messages: strings(&[
                "Objection overruled... by a laser!",
                "This court is adjourned!",
                "I'll appeal to a higher court!",
                "Case dismissed... for now.",
            ]),
        },
        EncounterConfig {
            name: "Dalbird".to_string(),
            level: 6,
            advance_to: 7,
            center: (600.0, 200.0),
            amplitude: (200.0, 100.0),
            phase_step: 0.02,
            width: 150.0,
            height: 150.0,
            health: 5,
            hit_score: 200,
            defeat_bonus: 2_000,
            taunt_interval_ms: 5_000,
            taunt_ticks: messages.duration_ticks,
            defeat_message_ticks: messages.duration_ticks * 2,
            flash_ticks: 30,
            taunts: strings(&[
                "Hey Ryan, I'm Dalbird",
                "Ryyyyyyan",
                "Ryan, are you stressed",
                "I love this song",
            ]),
            defeat_messages: strings(&[
                "Impossible! How could you...",
                "My birds... avenge me!",
                "This isn't the last you'll see of me!",
                "Noooooooo!",
                "I'll be back, stronger than ever!",
            ]),
        },
    ]
}
