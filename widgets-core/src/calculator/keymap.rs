//! Translation of raw front-end events into calculator [`Input`]s.
//!
//! Anything unrecognised maps to `None` and is ignored by callers; the engine
//! stays authoritative for which inputs are legal.

use super::{Digit, Input, Operation};

/// Maps a keyboard key name (as reported by a key-down event) to an input.
pub fn from_key(key: &str) -> Option<Input> {
    match key {
        "." => Some(Input::Decimal),
        "Enter" | "=" => Some(Input::Equals),
        "Backspace" | "Delete" => Some(Input::Backspace),
        "Escape" => Some(Input::Clear),
        "+" | "-" | "*" | "/" => Operation::try_from(key).ok().map(Input::Operation),
        _ => single_char(key).and_then(|c| Digit::try_from(c).ok()).map(Input::Digit),
    }
}

/// Maps a button's action name to an input.
pub fn from_action(action: &str) -> Option<Input> {
    match action {
        "dot" => Some(Input::Decimal),
        "clear" => Some(Input::Clear),
        "backspace" => Some(Input::Backspace),
        "sign" => Some(Input::ToggleSign),
        "equals" => Some(Input::Equals),
        _ => None,
    }
}

/// Maps one typed character of a terminal line to an input.
///
/// Besides the keyboard keys, `c` clears, `<` deletes and `~` / `±` toggles
/// the sign.
pub fn from_char(c: char) -> Option<Input> {
    if let Ok(d) = Digit::try_from(c) {
        return Some(Input::Digit(d));
    }

    match c {
        '.' => Some(Input::Decimal),
        '=' => Some(Input::Equals),
        '<' => Some(Input::Backspace),
        'c' | 'C' => Some(Input::Clear),
        '~' | '±' => Some(Input::ToggleSign),
        _ => {
            let mut buf = [0u8; 4];
            Operation::try_from(&*c.encode_utf8(&mut buf)).ok().map(Input::Operation)
        }
    }
}

/// Tokenizes a whole line.
///
/// Whitespace-separated words that name a button action (`sign`, `dot`, ...)
/// map through [`from_action`]; every other word is read character by
/// character, skipping unknown characters.
pub fn parse_keys(line: &str) -> Vec<Input> {
    let mut inputs = Vec::new();
    for word in line.split_whitespace() {
        match from_action(word) {
            Some(input) => inputs.push(input),
            None => inputs.extend(word.chars().filter_map(from_char)),
        }
    }
    inputs
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_keys() {
        assert_eq!(from_key("7"), Digit::new(7).map(Input::Digit));
        assert_eq!(from_key("Enter"), Some(Input::Equals));
        assert_eq!(from_key("="), Some(Input::Equals));
        assert_eq!(from_key("Delete"), Some(Input::Backspace));
        assert_eq!(from_key("Escape"), Some(Input::Clear));
        assert_eq!(from_key("/"), Some(Input::Operation(Operation::Divide)));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(from_key("Shift"), None);
        assert_eq!(from_key("a"), None);
        assert_eq!(from_key("12"), None);
        // The keyboard handler has no sign key.
        assert_eq!(from_key("~"), None);
    }

    #[test]
    fn button_actions() {
        assert_eq!(from_action("sign"), Some(Input::ToggleSign));
        assert_eq!(from_action("dot"), Some(Input::Decimal));
        assert_eq!(from_action("nope"), None);
    }

    #[test]
    fn line_tokenizer_accepts_action_words() {
        let inputs = parse_keys("12 sign dot 5");
        assert_eq!(inputs.len(), 5);
        assert_eq!(inputs[2], Input::ToggleSign);
        assert_eq!(inputs[3], Input::Decimal);

        let mut calc = crate::calculator::Calculator::new();
        calc.apply_all(parse_keys("12 sign dot 5 backspace backspace"));
        assert_eq!(calc.state().input(), "-12");
        calc.apply_all(parse_keys("+ 2 equals"));
        assert_eq!(calc.state().input(), "-10");
    }

    #[test]
    fn line_tokenizer() {
        let inputs = parse_keys("1 2 × 3 ? =");
        assert_eq!(
            inputs,
            vec![
                Input::Digit(Digit::new(1).expect("digit")),
                Input::Digit(Digit::new(2).expect("digit")),
                Input::Operation(Operation::Multiply),
                Input::Digit(Digit::new(3).expect("digit")),
                Input::Equals,
            ]
        );
    }
}
