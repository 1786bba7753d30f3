use crate::nav::{ItemId, Key, NavigationController, Point, PointerSource};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open,
    Close,
    Toggle,
    Navigate(ItemId),
    Hover(Option<ItemId>),
    Focus(Option<ItemId>),
    Key(Key),
    Move(Point),
    Press(Point, PointerSource),
    Destroy,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    Arguments {
        command: String,
        expected: &'static str,
    },
    #[error("'{0}' is not a number")]
    BadNumber(String),
    #[error("unknown key '{0}'")]
    BadKey(String),
    #[error(transparent)]
    Split(#[from] shell_words::ParseError),
}

fn optional_item(arg: &str) -> Option<ItemId> {
    (!arg.eq_ignore_ascii_case("none")).then(|| ItemId::new(arg))
}

fn number(raw: &str) -> Result<f64, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::BadNumber(raw.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words = shell_words::split(line)?;
        let Some((head, args)) = words.split_first() else {
            return Err(CommandError::Empty);
        };

        let arity = |expected: &'static str| CommandError::Arguments {
            command: head.clone(),
            expected,
        };

        let cmd = match (head.to_ascii_lowercase().as_str(), args) {
            ("open" | "show", []) => Self::Open,
            ("close" | "hide", []) => Self::Close,
            ("toggle", []) => Self::Toggle,
            ("destroy", []) => Self::Destroy,
            ("navigate", [id]) => Self::Navigate(ItemId::new(id.as_str())),
            ("hover", [id]) => Self::Hover(optional_item(id)),
            ("focus", [id]) => Self::Focus(optional_item(id)),
            ("key", [name]) => Self::Key(
                name.parse()
                    .map_err(|_| CommandError::BadKey(name.clone()))?,
            ),
            ("move", [x, y]) => Self::Move(Point::new(number(x)?, number(y)?)),
            ("click", [x, y]) => Self::Press(Point::new(number(x)?, number(y)?), PointerSource::Mouse),
            ("tap", [x, y]) => Self::Press(Point::new(number(x)?, number(y)?), PointerSource::Touch),
            ("open" | "show" | "close" | "hide" | "toggle" | "destroy", _) => {
                return Err(arity("no arguments"));
            }
            ("navigate" | "hover" | "focus", _) => return Err(arity("one item id")),
            ("key", _) => return Err(arity("one key name")),
            ("move" | "click" | "tap", _) => return Err(arity("x and y")),
            _ => return Err(CommandError::Unknown(head.clone())),
        };
        Ok(cmd)
    }
}

impl Command {
    pub fn apply(self, nav: &mut NavigationController) -> bool {
        match self {
            Self::Open => nav.open(),
            Self::Close => nav.close(),
            Self::Toggle => nav.toggle(),
            Self::Navigate(id) => nav.navigate(&id),
            Self::Hover(id) => nav.set_hovered_item(id),
            Self::Focus(id) => nav.set_focused_item(id),
            Self::Key(key) => nav.handle_key(key),
            Self::Move(point) => nav.hover_at(point),
            Self::Press(point, source) => nav.press_at(point, source),
            Self::Destroy => {
                nav.destroy();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigationConfigPatch;
    use crate::nav::{ManualClock, MenuPhase, NavigationItem};
    use std::time::Duration;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("open", Command::Open),
            ("  SHOW ", Command::Open),
            ("hide", Command::Close),
            ("toggle", Command::Toggle),
            ("navigate about", Command::Navigate(ItemId::from("about"))),
            ("navigate 'case studies'", Command::Navigate(ItemId::from("case studies"))),
            ("hover none", Command::Hover(None)),
            ("hover contact", Command::Hover(Some(ItemId::from("contact")))),
            ("focus NONE", Command::Focus(None)),
            ("key esc", Command::Key(Key::Escape)),
            ("move 10 -4.5", Command::Move(Point::new(10.0, -4.5))),
            ("tap 0 0", Command::Press(Point::default(), PointerSource::Touch)),
            ("click 1 2", Command::Press(Point::new(1.0, 2.0), PointerSource::Mouse)),
            ("destroy", Command::Destroy),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>().unwrap(), expected, "{line}");
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("".parse::<Command>(), Err(CommandError::Empty)));
        assert!(matches!("jump".parse::<Command>(), Err(CommandError::Unknown(_))));
        assert!(matches!("open now".parse::<Command>(), Err(CommandError::Arguments { .. })));
        assert!(matches!("navigate".parse::<Command>(), Err(CommandError::Arguments { .. })));
        assert!(matches!("move 1".parse::<Command>(), Err(CommandError::Arguments { .. })));
        assert!(matches!("move a 1".parse::<Command>(), Err(CommandError::BadNumber(_))));
        assert!(matches!("key F13".parse::<Command>(), Err(CommandError::BadKey(_))));
        assert!(matches!("navigate 'open".parse::<Command>(), Err(CommandError::Split(_))));
    }

    #[test]
    fn test_apply_drives_controller() {
        let clock = ManualClock::new();
        let mut nav = NavigationController::with_clock(clock.clone());
        nav.configure(NavigationConfigPatch {
            items: Some(vec![
                NavigationItem::new("home", "Home", "#hero", 0),
                NavigationItem::new("about", "About", "#about", 1),
            ]),
            animation_duration: Some(Duration::from_millis(10)),
            ..Default::default()
        })
        .unwrap();

        assert!(Command::Open.apply(&mut nav));
        clock.advance(Duration::from_millis(10));
        nav.tick();
        assert_eq!(nav.phase(), MenuPhase::Open);

        assert!(Command::Navigate(ItemId::from("about")).apply(&mut nav));
        assert!(!Command::Navigate(ItemId::from("missing")).apply(&mut nav));
        assert_eq!(nav.state().active_item, Some(ItemId::from("about")));

        assert!(Command::Destroy.apply(&mut nav));
        assert!(nav.is_destroyed());
        assert!(!Command::Toggle.apply(&mut nav));
    }
}
