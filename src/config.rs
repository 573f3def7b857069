use std::str::FromStr;
use std::time::Duration;

use bevy::prelude::Resource;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
}

/// Template for the actor spawned for every new connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTemplate {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub life: i32,
}

impl Default for PlayerTemplate {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 60.0,
            speed: 10.0,
            life: 100,
        }
    }
}

/// Server settings, read from the environment with sensible defaults.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub tick_hz: f64,
    pub world_width: f32,
    pub world_height: f32,
    pub player: PlayerTemplate,
    /// Outbound frames queued per client before new ones are dropped.
    pub client_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            tick_hz: 60.0,
            world_width: 1024.0,
            world_height: 576.0,
            player: PlayerTemplate::default(),
            client_buffer: 64,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source; unset variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            host: lookup("WEBSOCKET_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "WEBSOCKET_PORT", defaults.port)?,
            tick_hz: parse_var(&lookup, "TICK_HZ", defaults.tick_hz)?,
            world_width: parse_var(&lookup, "WORLD_WIDTH", defaults.world_width)?,
            world_height: parse_var(&lookup, "WORLD_HEIGHT", defaults.world_height)?,
            player: defaults.player,
            client_buffer: parse_var(&lookup, "CLIENT_BUFFER", defaults.client_buffer)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("TICK_HZ", self.tick_hz as f32),
            ("WORLD_WIDTH", self.world_width),
            ("WORLD_HEIGHT", self.world_height),
            ("CLIENT_BUFFER", self.client_buffer as f32),
        ];
        for (name, value) in positive {
            if value.is_infinite() {
                return Err(ConfigError::Invalid {
                    name,
                    value: value.to_string(),
                });
            }
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        // the fixed timestep must be a representable, non-zero duration
        match Duration::try_from_secs_f64(1.0 / self.tick_hz) {
            Ok(period) if !period.is_zero() => {}
            _ => {
                return Err(ConfigError::Invalid {
                    name: "TICK_HZ",
                    value: self.tick_hz.to_string(),
                });
            }
        }
        if self.player.width > self.world_width || self.player.height > self.world_height {
            return Err(ConfigError::Invalid {
                name: "WORLD_WIDTH/WORLD_HEIGHT",
                value: format!("{}x{}", self.world_width, self.world_height),
            });
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Length of one tick. Only meaningful for a validated config.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
