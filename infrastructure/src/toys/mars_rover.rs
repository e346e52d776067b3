//! Drive a rover across a rectangular plateau

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use toybox_application::{NoResources, Toy, ToyError};
use toybox_domain::{
    Constraint, Parameter, ParameterError, Requisites, ReturnCode, StringListParameter,
    StringParameter, ToyEnum, impl_enum_value,
};
use tracing::{debug, info};

pub const NAME: &str = "mars_rover";

/// Compass heading of the rover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    pub fn right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    fn step(self) -> (i64, i64) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(Direction::North),
            "E" => Ok(Direction::East),
            "S" => Ok(Direction::South),
            "W" => Ok(Direction::West),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        })
    }
}

impl ToyEnum for Direction {
    const VARIANTS: &'static [&'static str] = &["N", "E", "S", "W"];
}

impl_enum_value!(Direction);

/// Where the rover stands and which way it faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i64,
    pub y: i64,
    pub heading: Direction,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.heading)
    }
}

/// Plateau spanning `(0, 0)` to `(width, height)` inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plateau {
    pub width: i64,
    pub height: i64,
}

impl Plateau {
    pub fn contains(&self, x: i64, y: i64) -> bool {
        (0..=self.width).contains(&x) && (0..=self.height).contains(&y)
    }
}

/// Follow `commands` from `start`. `L` and `R` turn in place, `M` moves one
/// cell forward; a move that would leave the plateau is skipped.
pub fn drive(plateau: Plateau, start: Position, commands: &str) -> Position {
    commands
        .chars()
        .fold(start, |position, command| match command.to_ascii_uppercase() {
            'L' => Position {
                heading: position.heading.left(),
                ..position
            },
            'R' => Position {
                heading: position.heading.right(),
                ..position
            },
            'M' => {
                let (dx, dy) = position.heading.step();
                let next = position.x.checked_add(dx).zip(position.y.checked_add(dy));
                match next {
                    Some((x, y)) if plateau.contains(x, y) => Position { x, y, ..position },
                    _ => {
                        debug!(x = position.x, y = position.y, "Ignoring move off the plateau");
                        position
                    }
                }
            }
            _ => position,
        })
}

fn coordinates(key: &str, values: &[String]) -> Result<(i64, i64), ToyError> {
    match values {
        [x, y] => {
            let parse = |v: &String| {
                v.parse::<i64>()
                    .map_err(|_| ToyError::msg(format!("{key}: '{v}' is not an integer")))
            };
            Ok((parse(x)?, parse(y)?))
        }
        _ => Err(ToyError::msg(format!(
            "{key} needs exactly two coordinates, got {}",
            values.len()
        ))),
    }
}

/// Moves a rover over a plateau following a command string
#[derive(Debug)]
pub struct MarsRover {
    plateau: StringListParameter,
    start: StringListParameter,
    direction: Parameter<Direction>,
    commands: StringParameter,

    route: Option<(Plateau, Position)>,
    finish: Option<Position>,
}

impl MarsRover {
    pub fn new() -> Result<Self, ParameterError> {
        Ok(Self {
            plateau: StringListParameter::builder("mr.plateau")
                .required()
                .description("Upper right corner of the plateau, e.g., 5,5")
                .with_constraint(Constraint::length_in(&[2]))
                .build()?,
            start: StringListParameter::builder("mr.start")
                .default_value(vec!["0".to_string(), "0".to_string()])
                .description("Landing cell of the rover, e.g., 1,2")
                .with_constraint(Constraint::length_in(&[2]))
                .build()?,
            direction: Parameter::builder("mr.direction")
                .default_value(Direction::North)
                .description("Heading at landing")
                .build()?,
            commands: StringParameter::builder("mr.commands")
                .required()
                .description("Commands made of L, R and M")
                .constraint("v only has L, R or M", |v: &String| {
                    v.chars().all(|c| matches!(c.to_ascii_uppercase(), 'L' | 'R' | 'M'))
                })
                .build()?,
            route: None,
            finish: None,
        })
    }

    /// Position after the last run
    pub fn finish(&self) -> Option<Position> {
        self.finish
    }
}

#[async_trait]
impl Toy for MarsRover {
    type Provider = NoResources;

    fn name(&self) -> &str {
        NAME
    }

    fn parameter_prefix(&self) -> &str {
        "mr"
    }

    fn requisite<'a>(&'a mut self, requisites: &mut Requisites<'a>) {
        requisites
            .add(&mut self.plateau)
            .add(&mut self.start)
            .add(&mut self.direction)
            .add(&mut self.commands);
    }

    fn example_configuration(&self) -> Vec<(String, String)> {
        vec![
            (self.plateau.key().to_string(), "5,5".to_string()),
            (self.start.key().to_string(), "1,2".to_string()),
            (self.direction.key().to_string(), "N".to_string()),
            (self.commands.key().to_string(), "LMLMLMLMM".to_string()),
        ]
    }

    fn cross_validate(&mut self) -> Result<(), ToyError> {
        let (width, height) = coordinates(self.plateau.key().as_str(), self.plateau.require()?)?;
        if width < 0 || height < 0 {
            return Err(ToyError::msg(format!(
                "{} must not be negative",
                self.plateau.key()
            )));
        }
        let plateau = Plateau { width, height };

        let (x, y) = coordinates(self.start.key().as_str(), self.start.require()?)?;
        if !plateau.contains(x, y) {
            return Err(ToyError::msg(format!(
                "start ({x}, {y}) lies outside the plateau ({width}, {height})"
            )));
        }

        let heading = *self.direction.require()?;
        self.route = Some((plateau, Position { x, y, heading }));
        Ok(())
    }

    fn provider(&self) -> Result<NoResources, ToyError> {
        Ok(NoResources)
    }

    async fn have_fun(&mut self, _resource: &()) -> Result<ReturnCode, ToyError> {
        let (plateau, start) = self
            .route
            .ok_or_else(|| ToyError::msg("the route was not validated"))?;

        let finish = drive(plateau, start, self.commands.require()?);
        info!("Rover moved from {} to {}", start, finish);
        self.finish = Some(finish);
        Ok(ReturnCode::Success)
    }
}
