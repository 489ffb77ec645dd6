//! The scenario-file parser.
//!
//! Line-oriented ASCII, sections in order:
//!
//! ```text
//! <vehicle name>
//! MODULES
//!   <module-name>  <phase-list>
//! DATA
//!   <slot-name> = <value>
//! AERO_DECK <file>
//! PROP_DECK <file>
//! IF <watched-name> <op> <threshold>
//!   <slot-name> <new-value>
//! ENDIF
//! END
//! ```
//!
//! Lines whose first character is `#` (or `//`) are comments. Parsing is
//! pure text → [`ScenarioSpec`]; name resolution happens in the binder.

use crate::error::ScenarioError;
use traject_module::PhaseSet;

/// An `IF … ENDIF` event block, unresolved (names, not indices).
#[derive(Clone, Debug, PartialEq)]
pub struct EventBlock {
    /// 1-based line of the `IF`.
    pub line: usize,
    /// Watched slot name.
    pub watch: String,
    /// Operator text: `<`, `=`, or `>`.
    pub op: String,
    /// Threshold value.
    pub threshold: f64,
    /// Reassignments, in order: (line, slot name, new value).
    pub assignments: Vec<(usize, String, f64)>,
}

/// The parsed scenario, before any name is resolved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioSpec {
    /// Vehicle name from the first meaningful line.
    pub vehicle: String,
    /// `MODULES` entries in declared order: (line, name, phases).
    pub modules: Vec<(usize, String, PhaseSet)>,
    /// `DATA` assignments in order: (line, slot name, value).
    pub data: Vec<(usize, String, f64)>,
    /// Deck file names from `AERO_DECK`/`PROP_DECK` lines.
    pub decks: Vec<String>,
    /// Event blocks in declared order.
    pub events: Vec<EventBlock>,
    /// Integration step from the `dt` data key (loader default applies
    /// if absent).
    pub dt: Option<f64>,
    /// Output cadence from the `output_step` data key.
    pub output_step: Option<f64>,
}

impl ScenarioSpec {
    /// Whether a module name appears in the `MODULES` section.
    pub fn has_module(&self, name: &str) -> bool {
        self.modules.iter().any(|(_, n, _)| n == name)
    }

    /// Whether a `DATA` key was assigned.
    pub fn assigns(&self, name: &str) -> bool {
        self.data.iter().any(|(_, n, _)| n == name)
    }

    /// Parse scenario text.
    pub fn parse(text: &str) -> Result<Self, ScenarioError> {
        let mut spec = Self::default();
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| {
                let t = l.trim_start();
                !t.is_empty() && !t.starts_with('#') && !t.starts_with("//")
            })
            .peekable();

        // Vehicle name.
        let (_, name_line) = lines.next().ok_or(ScenarioError::Parse {
            line: 1,
            message: "empty scenario".to_string(),
        })?;
        spec.vehicle = name_line.trim().to_string();

        // MODULES header.
        match lines.next() {
            Some((_, l)) if l.trim() == "MODULES" => {}
            Some((line, l)) => {
                return Err(ScenarioError::Parse {
                    line,
                    message: format!("expected MODULES, found '{}'", l.trim()),
                })
            }
            None => {
                return Err(ScenarioError::Parse {
                    line: 1,
                    message: "missing MODULES section".to_string(),
                })
            }
        }

        // MODULES entries until the DATA header (or a later section).
        let mut reached_end = false;
        while let Some(&(line, l)) = lines.peek() {
            let t = l.trim();
            if t == "DATA" || t.starts_with("AERO_DECK") || t.starts_with("PROP_DECK")
                || t.starts_with("IF ") || t == "END"
            {
                break;
            }
            lines.next();
            let mut parts = t.split_whitespace();
            let name = parts.next().unwrap_or_default().to_string();
            let phases_text = parts.next().ok_or(ScenarioError::Parse {
                line,
                message: format!("module '{name}' is missing its phase list"),
            })?;
            let phases =
                PhaseSet::parse(phases_text).ok_or_else(|| ScenarioError::BadPhaseList {
                    line,
                    text: phases_text.to_string(),
                })?;
            spec.modules.push((line, name, phases));
        }

        // DATA section (optional).
        if let Some(&(_, l)) = lines.peek() {
            if l.trim() == "DATA" {
                lines.next();
                while let Some(&(line, l)) = lines.peek() {
                    let t = l.trim();
                    if t.starts_with("AERO_DECK") || t.starts_with("PROP_DECK")
                        || t.starts_with("IF ") || t == "END"
                    {
                        break;
                    }
                    lines.next();
                    let (name, value) = parse_assignment(line, t)?;
                    match name.as_str() {
                        "dt" => spec.dt = Some(value),
                        "output_step" => spec.output_step = Some(value),
                        _ => spec.data.push((line, name, value)),
                    }
                }
            }
        }

        // Deck lines and event blocks, any mix, until END.
        while let Some((line, l)) = lines.next() {
            let t = l.trim();
            if t == "END" {
                reached_end = true;
                break;
            }
            if let Some(file) = t.strip_prefix("AERO_DECK") {
                spec.decks.push(file.trim().to_string());
                continue;
            }
            if let Some(file) = t.strip_prefix("PROP_DECK") {
                spec.decks.push(file.trim().to_string());
                continue;
            }
            if let Some(rest) = t.strip_prefix("IF ") {
                spec.events.push(parse_event(line, rest, &mut lines)?);
                continue;
            }
            return Err(ScenarioError::Parse {
                line,
                message: format!("unexpected '{t}'"),
            });
        }

        if !reached_end {
            return Err(ScenarioError::Parse {
                line: text.lines().count().max(1),
                message: "missing END".to_string(),
            });
        }
        Ok(spec)
    }
}

fn parse_assignment(line: usize, text: &str) -> Result<(String, f64), ScenarioError> {
    let (name, value_text) = text.split_once('=').ok_or(ScenarioError::Parse {
        line,
        message: format!("expected '<name> = <value>', found '{text}'"),
    })?;
    let value = value_text
        .trim()
        .parse::<f64>()
        .map_err(|_| ScenarioError::Parse {
            line,
            message: format!("bad numeric value '{}'", value_text.trim()),
        })?;
    Ok((name.trim().to_string(), value))
}

fn parse_event<'a, I>(
    line: usize,
    header: &str,
    lines: &mut std::iter::Peekable<I>,
) -> Result<EventBlock, ScenarioError>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let mut parts = header.split_whitespace();
    let watch = parts.next().unwrap_or_default().to_string();
    let op = parts
        .next()
        .ok_or(ScenarioError::Parse {
            line,
            message: "IF is missing its operator".to_string(),
        })?
        .to_string();
    if !matches!(op.as_str(), "<" | "=" | ">") {
        return Err(ScenarioError::Parse {
            line,
            message: format!("bad event operator '{op}'"),
        });
    }
    let threshold_text = parts.next().ok_or(ScenarioError::Parse {
        line,
        message: "IF is missing its threshold".to_string(),
    })?;
    let threshold = threshold_text
        .parse::<f64>()
        .map_err(|_| ScenarioError::Parse {
            line,
            message: format!("bad event threshold '{threshold_text}'"),
        })?;

    let mut assignments = Vec::new();
    loop {
        let (a_line, l) = lines.next().ok_or(ScenarioError::Parse {
            line,
            message: "IF block is missing its ENDIF".to_string(),
        })?;
        let t = l.trim();
        if t == "ENDIF" {
            break;
        }
        let mut parts = t.split_whitespace();
        let name = parts.next().unwrap_or_default().to_string();
        let value_text = parts.next().ok_or(ScenarioError::Parse {
            line: a_line,
            message: format!("event assignment '{name}' is missing its value"),
        })?;
        let value = value_text
            .parse::<f64>()
            .map_err(|_| ScenarioError::Parse {
                line: a_line,
                message: format!("bad assignment value '{value_text}'"),
            })?;
        assignments.push((a_line, name, value));
    }

    Ok(EventBlock {
        line,
        watch,
        op,
        threshold,
        assignments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "\
# Parachute drop test
BALL
MODULES
  environment  def,exec
  atmosphere   def,exec
  forces       def,exec
  kinematics   def,init,exec
DATA
  dt = 0.01
  output_step = 0.1
  cd = 0.1
  area = 1.0
  sbel3 = -300
  endtime = 60
  min_alt = 0
AERO_DECK aero.asc
IF altitude < 100
  cd 1.0
ENDIF
END
";

    #[test]
    fn parses_all_sections() {
        let spec = ScenarioSpec::parse(SCENARIO).unwrap();
        assert_eq!(spec.vehicle, "BALL");
        assert_eq!(spec.modules.len(), 4);
        assert_eq!(spec.modules[3].1, "kinematics");
        assert!(spec.modules[3].2.has_init());
        assert_eq!(spec.dt, Some(0.01));
        assert_eq!(spec.output_step, Some(0.1));
        assert!(spec.assigns("cd"));
        assert!(spec.assigns("endtime"));
        assert_eq!(spec.decks, vec!["aero.asc".to_string()]);
        assert_eq!(spec.events.len(), 1);
        let event = &spec.events[0];
        assert_eq!(event.watch, "altitude");
        assert_eq!(event.op, "<");
        assert_eq!(event.threshold, 100.0);
        assert_eq!(event.assignments.len(), 1);
        assert_eq!(event.assignments[0].1, "cd");
    }

    #[test]
    fn missing_end_is_a_parse_error() {
        let text = "BALL\nMODULES\n  environment def,exec\nDATA\n  cd = 1\n";
        match ScenarioSpec::parse(text) {
            Err(ScenarioError::Parse { message, .. }) => {
                assert!(message.contains("missing END"))
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn bad_phase_list_reports_the_line() {
        let text = "BALL\nMODULES\n  environment def,run\nEND\n";
        match ScenarioSpec::parse(text) {
            Err(ScenarioError::BadPhaseList { line, text }) => {
                assert_eq!(line, 3);
                assert_eq!(text, "def,run");
            }
            other => panic!("expected BadPhaseList, got {other:?}"),
        }
    }

    #[test]
    fn bad_data_value_reports_the_line() {
        let text = "BALL\nMODULES\n environment def,exec\nDATA\n cd = squirrel\nEND\n";
        match ScenarioSpec::parse(text) {
            Err(ScenarioError::Parse { line, message }) => {
                assert_eq!(line, 5);
                assert!(message.contains("squirrel"));
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_event_block_rejected() {
        let text = "BALL\nMODULES\n environment def,exec\nIF altitude < 100\n cd 1.0\nEND\n";
        // The END is swallowed as a malformed assignment, so the block
        // never closes.
        assert!(ScenarioSpec::parse(text).is_err());
    }

    #[test]
    fn bad_operator_rejected() {
        let text = "BALL\nMODULES\n environment def,exec\nIF altitude >= 100\nENDIF\nEND\n";
        match ScenarioSpec::parse(text) {
            Err(ScenarioError::Parse { message, .. }) => {
                assert!(message.contains(">="), "{message}")
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let text = "\n# c\nBALL\n\nMODULES\n// c\n environment def,exec\nEND\n";
        let spec = ScenarioSpec::parse(text).unwrap();
        assert_eq!(spec.vehicle, "BALL");
        assert_eq!(spec.modules.len(), 1);
    }
}
