use crate::path::{self, PathCommand};
use thiserror::Error;
use tracing::warn;

/// Why two path strings cannot be blended command by command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Incompatibility {
    #[error("path data length mismatch: {from} vs {to} commands")]
    LengthMismatch { from: usize, to: usize },
    #[error("path command mismatch at {index}: `{from}` vs `{to}`")]
    CommandMismatch { index: usize, from: char, to: char },
}

pub fn check_compatible(from: &[PathCommand], to: &[PathCommand]) -> Result<(), Incompatibility> {
    if from.len() != to.len() {
        return Err(Incompatibility::LengthMismatch {
            from: from.len(),
            to: to.len(),
        });
    }
    for (index, (a, b)) in from.iter().zip(to).enumerate() {
        if a.letter != b.letter {
            return Err(Incompatibility::CommandMismatch {
                index,
                from: a.letter,
                to: b.letter,
            });
        }
    }
    Ok(())
}

/// Blends two path strings. Compatible inputs are interpolated argument by argument; anything
/// else snaps to `from` below the halfway point and to `to` from there on.
pub fn morph(from: &str, to: &str, fraction: f64) -> String {
    let from_cmds = path::parse(from);
    let to_cmds = path::parse(to);

    if let Err(reason) = check_compatible(&from_cmds, &to_cmds) {
        warn!(%reason, "Paths are not morphable, snapping");
        let snapped = if fraction < 0.5 { from } else { to };
        return snapped.to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    for (a, b) in from_cmds.iter().zip(&to_cmds) {
        parts.push(a.letter.to_string());
        for (j, &v1) in a.args.iter().enumerate() {
            // The shorter argument list borrows the start value.
            let v2 = b.args.get(j).copied().unwrap_or(v1);
            parts.push(format_arg(v1 + (v2 - v1) * fraction));
        }
    }
    parts.join(" ")
}

fn format_arg(value: f64) -> String {
    let text = format!("{:.3}", value);
    if text == "-0.000" {
        "0.000".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_morph() {
        let d = "M0,0 L24,24 C1 2 3 4 5 6 Z";
        for f in [0.0, 0.3, 1.0] {
            assert_eq!(
                morph(d, d, f),
                "M 0.000 0.000 L 24.000 24.000 C 1.000 2.000 3.000 4.000 5.000 6.000 Z"
            );
        }
    }

    #[test]
    fn test_interpolates_arguments() {
        assert_eq!(morph("M0,0 L10,10", "M10,0 L20,30", 0.5), "M 5.000 0.000 L 15.000 20.000");
        assert_eq!(morph("M0,0", "M1,1", 1.0 / 3.0), "M 0.333 0.333");
    }

    #[test]
    fn test_length_mismatch_snaps() {
        let from = "M0,0 L1,1";
        let to = "M0,0 L1,1 L2,2";
        assert_eq!(morph(from, to, 0.0), from);
        assert_eq!(morph(from, to, 0.49), from);
        assert_eq!(morph(from, to, 0.5), to);
        assert_eq!(morph(from, to, 1.0), to);
    }

    #[test]
    fn test_command_mismatch_snaps() {
        assert_eq!(morph("M0,0 L1,1", "M0,0 Q1,1 2,2", 0.7), "M0,0 Q1,1 2,2");
        let err = check_compatible(&path::parse("M0,0 L1,1"), &path::parse("M0,0 Q1,1 2,2"));
        assert_eq!(
            err,
            Err(Incompatibility::CommandMismatch {
                index: 1,
                from: 'L',
                to: 'Q'
            })
        );
    }

    #[test]
    fn test_argument_count_mismatch_pads_with_start_values() {
        assert_eq!(morph("L10,10", "L20", 0.5), "L 15.000 10.000");
    }

    #[test]
    fn test_negative_zero_is_normalized() {
        assert_eq!(morph("M-0.0001,0", "M-0.0001,0", 0.5), "M 0.000 0.000");
    }
}
