//! Driver configuration: JSON file defaults plus command-line overrides.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Move-selection strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Random,
    /// Largest piece.
    Greedy,
    /// Most own moves afterwards.
    Mobility,
    /// Fewest opponent moves afterwards.
    Blocker,
    /// Closest to the middle of the board.
    Center,
    /// Farthest from the middle of the board.
    Outward,
    /// Closest to the own starting corner.
    Corner,
    /// Farthest from the own starting corner.
    Advance,
    /// Closest to the leading opponent.
    Chase,
    /// Farthest from the leading opponent.
    Avoid,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 10] = [
        StrategyKind::Random,
        StrategyKind::Greedy,
        StrategyKind::Mobility,
        StrategyKind::Blocker,
        StrategyKind::Center,
        StrategyKind::Outward,
        StrategyKind::Corner,
        StrategyKind::Advance,
        StrategyKind::Chase,
        StrategyKind::Avoid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Greedy => "greedy",
            StrategyKind::Mobility => "mobility",
            StrategyKind::Blocker => "blocker",
            StrategyKind::Center => "center",
            StrategyKind::Outward => "outward",
            StrategyKind::Corner => "corner",
            StrategyKind::Advance => "advance",
            StrategyKind::Chase => "chase",
            StrategyKind::Avoid => "avoid",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SimError::Usage(format!("unknown strategy: {}", s)))
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Second strategy blended in at random, `NAME:RATIO` on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MixConfig {
    pub strategy: StrategyKind,
    /// Chance per turn of playing `strategy` instead of the main one.
    pub ratio: f64,
}

impl FromStr for MixConfig {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, ratio) = split_pair(s)?;
        Ok(MixConfig {
            strategy: name.parse()?,
            ratio: ratio
                .parse()
                .map_err(|_| SimError::Usage(format!("invalid mix ratio: {}", ratio)))?,
        })
    }
}

/// Strategy for each player's first moves, `NAME:MOVES` on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningConfig {
    pub strategy: StrategyKind,
    pub moves: usize,
}

impl FromStr for OpeningConfig {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, moves) = split_pair(s)?;
        Ok(OpeningConfig {
            strategy: name.parse()?,
            moves: moves
                .parse()
                .map_err(|_| SimError::Usage(format!("invalid opening length: {}", moves)))?,
        })
    }
}

fn split_pair(s: &str) -> Result<(&str, &str), SimError> {
    s.split_once(':')
        .ok_or_else(|| SimError::Usage(format!("expected NAME:VALUE, got {}", s)))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of games to play.
    pub games: usize,
    /// Seed of the first game; later games use `seed + index`. Random when absent.
    pub seed: Option<u64>,
    pub strategy: StrategyKind,
    pub mix: Option<MixConfig>,
    pub opening: Option<OpeningConfig>,
    /// Side of the square board.
    pub board_size: usize,
    /// Print the final board of every game.
    pub show: bool,
    /// Use terminal colors when printing boards.
    pub color: bool,
    /// Write a move log per game.
    pub record: Option<PathBuf>,
    pub log_interval_secs: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            games: 1,
            seed: None,
            strategy: StrategyKind::Random,
            mix: None,
            opening: None,
            board_size: blokus_core::standard::BOARD_SIZE,
            show: false,
            color: true,
            record: None,
            log_interval_secs: 5,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
pub enum Command {
    Run(SimConfig),
    Help,
}

impl SimConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<SimConfig, SimError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Parse arguments (without the program name).
    ///
    /// `--config FILE` is applied first wherever it appears, so explicit
    /// flags always win over the file.
    pub fn from_args(args: &[String]) -> Result<Command, SimError> {
        let mut config = match flag_value(args, "--config")? {
            Some(path) => SimConfig::load(Path::new(path))?,
            None => SimConfig::default(),
        };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => {
                    i += 1;
                }
                "--games" => {
                    i += 1;
                    config.games = parse_value(args, i, "--games")?;
                }
                "--seed" => {
                    i += 1;
                    config.seed = Some(parse_value(args, i, "--seed")?);
                }
                "--strategy" => {
                    i += 1;
                    config.strategy = parse_value(args, i, "--strategy")?;
                }
                "--mix" => {
                    i += 1;
                    config.mix = Some(parse_value(args, i, "--mix")?);
                }
                "--opening" => {
                    i += 1;
                    config.opening = Some(parse_value(args, i, "--opening")?);
                }
                "--size" => {
                    i += 1;
                    config.board_size = parse_value(args, i, "--size")?;
                }
                "--show" => {
                    config.show = true;
                }
                "--no-color" => {
                    config.color = false;
                }
                "--record" => {
                    i += 1;
                    config.record = Some(PathBuf::from(required(args, i, "--record")?));
                }
                "-h" | "--help" => return Ok(Command::Help),
                other => {
                    return Err(SimError::Usage(format!("unknown argument: {}", other)));
                }
            }
            i += 1;
        }

        Ok(Command::Run(config))
    }

    /// Log path for game `index`. Multi-game runs get an index suffix.
    pub fn record_path(&self, index: usize) -> Option<PathBuf> {
        let base = self.record.as_ref()?;
        if self.games <= 1 {
            return Some(base.clone());
        }
        let stem = base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match base.extension() {
            Some(ext) => format!("{}-{}.{}", stem, index, ext.to_string_lossy()),
            None => format!("{}-{}", stem, index),
        };
        Some(base.with_file_name(name))
    }
}

fn required<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, SimError> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| SimError::Usage(format!("{} needs a value", flag)))
}

fn parse_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, SimError> {
    let raw = required(args, i, flag)?;
    raw.parse()
        .map_err(|_| SimError::Usage(format!("invalid value for {}: {}", flag, raw)))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>, SimError> {
    match args.iter().position(|a| a == flag) {
        Some(i) => required(args, i + 1, flag).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run(list: &[&str]) -> SimConfig {
        match SimConfig::from_args(&args(list)).unwrap() {
            Command::Run(config) => config,
            Command::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn test_defaults() {
        let config = run(&[]);
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.board_size, 20);
        assert_eq!(config.games, 1);
        assert!(config.color);
    }

    #[test]
    fn test_flags_override() {
        let config = run(&[
            "--games", "3", "--seed", "7", "--strategy", "greedy", "--size", "14", "--show",
            "--no-color", "--record", "out.blk",
        ]);
        assert_eq!(config.games, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.strategy, StrategyKind::Greedy);
        assert_eq!(config.board_size, 14);
        assert!(config.show);
        assert!(!config.color);
        assert_eq!(config.record, Some(PathBuf::from("out.blk")));
    }

    #[test]
    fn test_bad_arguments() {
        assert!(matches!(
            SimConfig::from_args(&args(&["--games", "many"])),
            Err(SimError::Usage(_))
        ));
        assert!(matches!(
            SimConfig::from_args(&args(&["--seed"])),
            Err(SimError::Usage(_))
        ));
        assert!(matches!(
            SimConfig::from_args(&args(&["--strategy", "minimax"])),
            Err(SimError::Usage(_))
        ));
        assert!(matches!(
            SimConfig::from_args(&args(&["--mix", "greedy"])),
            Err(SimError::Usage(_))
        ));
        assert!(matches!(
            SimConfig::from_args(&args(&["--opening", "center:three"])),
            Err(SimError::Usage(_))
        ));
        assert!(matches!(
            SimConfig::from_args(&args(&["--fast"])),
            Err(SimError::Usage(_))
        ));
    }

    #[test]
    fn test_strategy_names_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_mix_and_opening_flags() {
        let config = run(&["--strategy", "blocker", "--mix", "random:0.2", "--opening", "center:3"]);
        assert_eq!(config.strategy, StrategyKind::Blocker);
        assert_eq!(
            config.mix,
            Some(MixConfig {
                strategy: StrategyKind::Random,
                ratio: 0.2
            })
        );
        assert_eq!(
            config.opening,
            Some(OpeningConfig {
                strategy: StrategyKind::Center,
                moves: 3
            })
        );
    }

    #[test]
    fn test_mix_and_opening_from_file() {
        let path = std::env::temp_dir().join("blokus_sim_test_mix_config.json");
        fs::write(
            &path,
            r#"{"strategy": "chase", "mix": {"strategy": "avoid", "ratio": 0.5}, "opening": {"strategy": "advance", "moves": 4}}"#,
        )
        .unwrap();
        let config = SimConfig::load(&path).unwrap();
        assert_eq!(config.strategy, StrategyKind::Chase);
        assert_eq!(config.mix.map(|m| m.strategy), Some(StrategyKind::Avoid));
        assert_eq!(config.opening.map(|o| o.moves), Some(4));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_help() {
        assert_eq!(
            SimConfig::from_args(&args(&["--show", "-h"])).unwrap(),
            Command::Help
        );
    }

    #[test]
    fn test_config_file_then_flags() {
        let path = std::env::temp_dir().join("blokus_sim_test_config.json");
        fs::write(&path, r#"{"games": 5, "strategy": "greedy", "board_size": 12}"#).unwrap();

        let path_str = path.to_string_lossy().into_owned();
        let config = run(&["--games", "2", "--config", &path_str]);
        assert_eq!(config.games, 2);
        assert_eq!(config.strategy, StrategyKind::Greedy);
        assert_eq!(config.board_size, 12);
        assert_eq!(config.log_interval_secs, 5);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_config_file() {
        let path = std::env::temp_dir().join("blokus_sim_test_bad_config.json");
        fs::write(&path, r#"{"games": "five"}"#).unwrap();
        assert!(matches!(SimConfig::load(&path), Err(SimError::Config(_))));
        fs::remove_file(&path).ok();

        assert!(matches!(
            SimConfig::load(Path::new("/nonexistent/blokus.json")),
            Err(SimError::Io(_))
        ));
    }

    #[test]
    fn test_record_path() {
        let mut config = SimConfig {
            record: Some(PathBuf::from("logs/game.blk")),
            ..SimConfig::default()
        };
        assert_eq!(config.record_path(0), Some(PathBuf::from("logs/game.blk")));

        config.games = 3;
        assert_eq!(config.record_path(2), Some(PathBuf::from("logs/game-2.blk")));

        config.record = None;
        assert_eq!(config.record_path(0), None);
    }
}
