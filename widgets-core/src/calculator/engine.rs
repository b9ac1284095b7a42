use tracing::{debug, trace};

use super::{Digit, ERROR_MARKER, Input, Operation, Phase, compute, format};

/// Raw engine state. Read-only outside of [`Calculator`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    operand_a: Option<f64>,
    operand_b: Option<f64>,
    operation: Option<Operation>,
    input: String,
    last_was_equals: bool,
    has_error: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            operand_a: None,
            operand_b: None,
            operation: None,
            input: "0".to_string(),
            last_was_equals: false,
            has_error: false,
        }
    }
}

impl CalculatorState {
    pub fn operand_a(&self) -> Option<f64> {
        self.operand_a
    }

    pub fn operand_b(&self) -> Option<f64> {
        self.operand_b
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn last_was_equals(&self) -> bool {
        self.last_was_equals
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }
}

/// The two strings a front end paints after every event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Display {
    pub expression: String,
    pub result: String,
}

#[derive(Debug, Clone, Default)]
pub struct Calculator {
    state: CalculatorState,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.is_in_error() {
            Phase::Error
        } else if self.state.last_was_equals {
            Phase::Result
        } else if self.state.operation.is_some() {
            Phase::PendingOperator
        } else {
            Phase::Entering
        }
    }

    /// Dispatches one input event.
    pub fn apply(&mut self, input: Input) {
        trace!(?input, state = ?self.state, "calculator input");
        match input {
            Input::Digit(d) => self.append_digit(d),
            Input::Decimal => self.add_decimal(),
            Input::Operation(op) => self.select_operation(op),
            Input::Equals => self.calculate(),
            Input::Clear => self.clear(),
            Input::Backspace => self.delete_last_char(),
            Input::ToggleSign => self.toggle_sign(),
        }
    }

    pub fn apply_all<I>(&mut self, inputs: I)
    where
        I: IntoIterator<Item = Input>,
    {
        for input in inputs {
            self.apply(input);
        }
    }

    pub fn append_digit(&mut self, digit: Digit) {
        self.reset_after_error_or_equals();

        let d = digit.as_char();
        match self.state.input.as_str() {
            "0" => self.state.input = d.to_string(),
            "-0" => self.state.input = format!("-{d}"),
            _ => self.state.input.push(d),
        }
    }

    pub fn add_decimal(&mut self) {
        self.reset_after_error_or_equals();

        if !self.state.input.contains('.') {
            self.state.input.push('.');
        }
    }

    pub fn toggle_sign(&mut self) {
        if self.is_in_error() || matches!(self.state.input.as_str(), "0" | "0.") {
            return;
        }

        self.state.input = match self.state.input.strip_prefix('-') {
            Some(rest) => rest.to_string(),
            None => format!("-{}", self.state.input),
        };
    }

    pub fn delete_last_char(&mut self) {
        if self.is_in_error() || self.state.last_was_equals {
            return;
        }

        let input = &mut self.state.input;
        let len = input.chars().count();
        if len <= 1 || (len == 2 && input.starts_with('-')) {
            *input = "0".to_string();
        } else {
            input.pop();
            if *input == "-" {
                *input = "0".to_string();
            }
        }
    }

    pub fn clear(&mut self) {
        self.state = CalculatorState::default();
    }

    pub fn select_operation(&mut self, op: Operation) {
        if self.is_in_error() {
            return;
        }
        let n = self.input_as_number();

        if self.state.last_was_equals {
            self.state.last_was_equals = false;
            self.state.operand_b = None;
        }

        let Some(a) = self.state.operand_a else {
            self.state.operand_a = Some(n);
            self.state.operation = Some(op);
            self.state.input = "0".to_string();
            return;
        };

        match self.state.operation {
            Some(pending) if self.state.input != "0" => {
                self.state.operand_b = Some(n);
                let result = compute(a, pending, n);
                if !result.is_finite() {
                    self.enter_error();
                    return;
                }

                self.state.operand_a = Some(result);
                self.state.operand_b = None;
                self.state.operation = Some(op);
                self.state.input = "0".to_string();
            }
            _ => self.state.operation = Some(op),
        }
    }

    pub fn calculate(&mut self) {
        if self.is_in_error() {
            return;
        }
        let (Some(a), Some(op)) = (self.state.operand_a, self.state.operation) else {
            return;
        };

        let n = self.input_as_number();
        let b = if self.state.last_was_equals { self.state.operand_b.unwrap_or(n) } else { n };

        let result = compute(a, op, b);
        if !result.is_finite() {
            self.enter_error();
            return;
        }

        self.state.operand_b = Some(b);
        self.state.operand_a = Some(result);
        self.state.input = format(result);
        self.state.last_was_equals = true;
    }

    /// Expression and result lines for the current state.
    pub fn display(&self) -> Display {
        let mut parts = Vec::with_capacity(3);
        if let Some(a) = self.state.operand_a {
            parts.push(format(a));
        }
        if let Some(op) = self.state.operation {
            parts.push(op.symbol().to_string());
        }
        if let Some(b) = self.state.operand_b.filter(|_| !self.state.last_was_equals) {
            parts.push(format(b));
        }

        Display { expression: parts.join(" "), result: self.state.input.clone() }
    }

    fn is_in_error(&self) -> bool {
        self.state.has_error || self.state.input == ERROR_MARKER
    }

    fn input_as_number(&self) -> f64 {
        match self.state.input.as_str() {
            "." | "-." => 0.0,
            s => s.parse().unwrap_or(0.0),
        }
    }

    fn reset_after_error_or_equals(&mut self) {
        if self.is_in_error() || self.state.last_was_equals {
            self.clear();
        }
    }

    fn enter_error(&mut self) {
        debug!(state = ?self.state, "non-finite result, entering error state");
        self.state = CalculatorState {
            input: ERROR_MARKER.to_string(),
            has_error: true,
            ..CalculatorState::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc_with(keys: &str) -> Calculator {
        let mut calc = Calculator::new();
        calc.apply_all(crate::calculator::keymap::parse_keys(keys));
        calc
    }

    fn digit(d: u8) -> Digit {
        Digit::new(d).expect("valid digit")
    }

    #[test]
    fn initial_state() {
        let calc = Calculator::new();
        assert_eq!(calc.state().input(), "0");
        assert_eq!(calc.phase(), Phase::Entering);
        assert_eq!(calc.display(), Display { expression: String::new(), result: "0".into() });
    }

    #[test]
    fn leading_zero_is_replaced() {
        let mut calc = Calculator::new();
        calc.append_digit(digit(0));
        calc.append_digit(digit(7));
        assert_eq!(calc.state().input(), "7");
    }

    #[test]
    fn negative_zero_is_replaced() {
        let mut calc = calc_with("0.");
        calc.toggle_sign();
        assert_eq!(calc.state().input(), "0.");

        let mut calc = calc_with("0.5~<<");
        assert_eq!(calc.state().input(), "-0");
        calc.append_digit(digit(3));
        assert_eq!(calc.state().input(), "-3");
    }

    #[test]
    fn single_decimal_point() {
        let calc = calc_with("1..2.3");
        assert_eq!(calc.state().input(), "1.23");
    }

    #[test]
    fn decimal_alone_counts_as_zero() {
        let calc = calc_with(".+2=");
        assert_eq!(calc.state().input(), "2");
    }

    #[test]
    fn toggle_sign_cases() {
        let mut calc = Calculator::new();
        calc.toggle_sign();
        assert_eq!(calc.state().input(), "0");

        let mut calc = calc_with("5");
        calc.toggle_sign();
        assert_eq!(calc.state().input(), "-5");
        calc.toggle_sign();
        assert_eq!(calc.state().input(), "5");
    }

    #[test]
    fn backspace_cases() {
        assert_eq!(calc_with("5~<").state().input(), "0");
        assert_eq!(calc_with("12<").state().input(), "1");
        assert_eq!(calc_with("12~<").state().input(), "-1");
        assert_eq!(calc_with("7<<").state().input(), "0");
    }

    #[test]
    fn backspace_ignored_after_equals() {
        let calc = calc_with("12+3=<");
        assert_eq!(calc.state().input(), "15");
    }

    #[test]
    fn digit_after_equals_starts_fresh() {
        let mut calc = calc_with("7+3=");
        assert_eq!(calc.state().input(), "10");
        assert_eq!(calc.phase(), Phase::Result);

        calc.append_digit(digit(4));
        assert_eq!(calc.state().input(), "4");
        assert_eq!(calc.state().operand_a(), None);
        assert_eq!(calc.phase(), Phase::Entering);
    }

    #[test]
    fn repeated_equals_reapplies_last_operand() {
        let mut calc = calc_with("6-2=");
        assert_eq!(calc.state().input(), "4");
        calc.calculate();
        assert_eq!(calc.state().input(), "2");
        calc.calculate();
        assert_eq!(calc.state().input(), "0");
    }

    #[test]
    fn operator_substitution() {
        let calc = calc_with("5+-3=");
        assert_eq!(calc.state().input(), "2");
    }

    #[test]
    fn chained_operators_compute_intermediate() {
        let calc = calc_with("2+3*");
        assert_eq!(calc.state().operand_a(), Some(5.0));
        assert_eq!(calc.state().operation(), Some(Operation::Multiply));
        assert_eq!(calc.state().input(), "0");
        assert_eq!(calc.phase(), Phase::PendingOperator);
        assert_eq!(calc.display().expression, "5 *");
    }

    #[test]
    fn operator_after_equals_folds_displayed_result() {
        // The result is still treated as freshly typed input, so `*` first applies `+ 10`.
        let calc = calc_with("7+3=*2=");
        assert_eq!(calc.state().input(), "40");
    }

    #[test]
    fn divide_by_zero_enters_error() {
        let calc = calc_with("8/0=");
        assert_eq!(calc.state().input(), ERROR_MARKER);
        assert!(calc.state().has_error());
        assert_eq!(calc.state().operand_a(), None);
        assert_eq!(calc.state().operation(), None);
        assert_eq!(calc.phase(), Phase::Error);
        assert_eq!(calc.display().expression, "");
    }

    #[test]
    fn divide_by_zero_while_chaining_enters_error() {
        let calc = calc_with("8/0.0+");
        assert_eq!(calc.state().input(), ERROR_MARKER);
        assert!(calc.state().has_error());
    }

    #[test]
    fn error_state_ignores_everything_but_digits_decimal_clear() {
        let mut calc = calc_with("1/0=");
        for input in [Input::ToggleSign, Input::Backspace, Input::Equals] {
            calc.apply(input);
            assert_eq!(calc.state().input(), ERROR_MARKER);
        }
        calc.apply(Input::Operation(Operation::Add));
        assert_eq!(calc.state().operation(), None);

        calc.add_decimal();
        assert_eq!(calc.state().input(), "0.");
        assert!(!calc.state().has_error());
    }

    #[test]
    fn display_shows_pending_operands() {
        let calc = calc_with("12+");
        assert_eq!(calc.display(), Display { expression: "12 +".into(), result: "0".into() });

        let calc = calc_with("12+3=");
        assert_eq!(calc.display(), Display { expression: "15 +".into(), result: "15".into() });
    }

    #[test]
    fn equals_without_operation_is_noop() {
        let calc = calc_with("42=");
        assert_eq!(calc.state().input(), "42");
        assert!(!calc.state().last_was_equals());
    }

    #[test]
    fn clear_resets_everything() {
        let mut calc = calc_with("9*9=");
        calc.clear();
        assert_eq!(calc.state(), &CalculatorState::default());
    }
}
