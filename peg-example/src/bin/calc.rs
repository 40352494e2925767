//! Integer calculator
//!
//! Parses `+ - * /` expressions with the usual precedence and evaluates
//! them left to right. Left associativity is expressed by parsing each
//! precedence level as a list: a left operand followed by one or more
//! `(operator, right operand)` pairs.
//!
//! Set `PEG_LOG=debug` to see when a failed parse is rerun for error
//! reporting.

use peg_framework::dsl::*;
use peg_framework::{rule, Atom, Grammar, ParseFailed, ParseOptions, Tree};
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

struct Calc;

impl Calc {
    rule!(fn addition() {
        Self::multiplication().named("l")
            >> (Self::add_op() >> Self::multiplication().named("r")).repeat(1)
            | Self::multiplication()
    });
    rule!(fn multiplication() {
        Self::integer().named("l") >> (Self::mult_op() >> Self::integer().named("r")).repeat(1)
            | Self::integer()
    });
    rule!(fn integer() { Self::digit().repeat(1).named("i") >> Self::space_opt() });
    rule!(fn mult_op() { re("[*/]").named("o") >> Self::space_opt() });
    rule!(fn add_op() { re("[+-]").named("o") >> Self::space_opt() });
    rule!(fn digit() { re("[0-9]") });
    rule!(fn space_opt() as "space?" { re("[\\s]").repeat(0) });
}

impl Grammar for Calc {
    fn root(&self) -> Atom {
        Self::addition()
    }
}

#[derive(Debug, Error)]
enum CalcError {
    #[error(transparent)]
    Parse(#[from] ParseFailed),
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer out of range: {0}")]
    Overflow(String),
    #[error("unexpected tree: {0:?}")]
    Malformed(Tree),
}

fn evaluate(tree: &Tree) -> Result<i64, CalcError> {
    match tree {
        Tree::Seq(items) => {
            let (first, rest) = items
                .split_first()
                .ok_or_else(|| CalcError::Malformed(tree.clone()))?;
            let mut acc = evaluate(&first["l"])?;
            for item in rest {
                acc = apply(acc, &item["o"], evaluate(&item["r"])?)?;
            }
            Ok(acc)
        }
        Tree::Map(_) if !tree["i"].is_nil() => {
            let digits = tree["i"]
                .as_slice()
                .ok_or_else(|| CalcError::Malformed(tree.clone()))?;
            digits
                .to_int()
                .map_err(|_| CalcError::Overflow(digits.to_string()))
        }
        Tree::Map(_) if !tree["l"].is_nil() => evaluate(&tree["l"]),
        _ => Err(CalcError::Malformed(tree.clone())),
    }
}

fn apply(left: i64, op: &Tree, right: i64) -> Result<i64, CalcError> {
    let overflow = || CalcError::Overflow(format!("{} {:?} {}", left, op, right));
    match op.as_str() {
        Some("+") => left.checked_add(right).ok_or_else(overflow),
        Some("-") => left.checked_sub(right).ok_or_else(overflow),
        Some("*") => left.checked_mul(right).ok_or_else(overflow),
        Some("/") if right == 0 => Err(CalcError::DivisionByZero),
        Some("/") => left.checked_div(right).ok_or_else(overflow),
        _ => Err(CalcError::Malformed(op.clone())),
    }
}

fn calculate(input: &str) -> Result<i64, CalcError> {
    let parsed = Calc.parse_with(input, &ParseOptions::new())?;
    evaluate(&parsed.tree)
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let level = std::env::var("PEG_LOG")
        .ok()
        .and_then(|value| value.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let expressions = [
        "1 + 2",
        "3 * 4 + 5",
        "10 - 3 * 2",
        "15 / 3 + 2 * 4",
        "100 + 20 * 3 - 5",
        "2 * 3 * 4",
        "20 / 4 / 2",
        "1 / 0",
        "1 + * 2",
    ];

    println!("=== Integer calculator ===\n");
    info!(grammar = %Calc.root(), "calculator grammar ready");

    for expr in expressions {
        println!("Expression: {}", expr);
        match calculate(expr) {
            Ok(value) => println!("  Result: {}", value),
            Err(CalcError::Parse(err)) => {
                println!("  Parse failed:");
                for line in err.ascii_tree().lines() {
                    println!("    {}", line);
                }
            }
            Err(err) => println!("  Evaluation failed: {}", err),
        }
        println!("{}", "-".repeat(30));
    }

    Ok(())
}
