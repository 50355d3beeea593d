//! Math function overlay
//!
//! A user formula in `x` is drawn across the visible time window. Formulas
//! run in a sandboxed Rhai engine with the usual scalar math functions:
//!
//! - `sin(x)`, `cos(x)`, `tan(x)`
//! - `sqrt(x)`, `exp(x)`, `abs(x)`
//! - `log(x)` (base 10), `ln(x)` (natural)
//! - `power(a, b)`, also written `a ** b`
//! - the constant `pi`
//!
//! Integer and float literals mix freely, e.g. `2 * sin(2 * pi * 50 * x)`.

use rhai::{Dynamic, Engine, Scope, AST, FLOAT, INT};

use crate::error::{Result, ScopeViewError};

/// Samples drawn across the window
pub const OVERLAY_SAMPLES: usize = 1000;

/// A compiled overlay formula
pub struct MathOverlay {
    engine: Engine,
    ast: AST,
    source: String,
}

impl MathOverlay {
    /// Compile a formula
    ///
    /// Returns `Ok(None)` for a blank formula, meaning no overlay is drawn.
    pub fn compile(formula: &str) -> Result<Option<Self>> {
        let source = formula.trim();
        if source.is_empty() {
            return Ok(None);
        }

        let mut engine = Engine::new();
        configure_engine(&mut engine);

        let ast = engine
            .compile_expression(source)
            .map_err(|e| ScopeViewError::Overlay(format!("Invalid formula '{}': {}", source, e)))?;

        tracing::debug!("Compiled overlay formula '{}'", source);
        Ok(Some(Self {
            engine,
            ast,
            source: source.to_string(),
        }))
    }

    /// Formula text as compiled
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate the formula at a single `x`
    pub fn eval_at(&self, x: f64) -> Result<f64> {
        let mut scope = Scope::new();
        scope.push_constant("pi", std::f64::consts::PI as FLOAT);
        scope.push("x", x as FLOAT);

        let value = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &self.ast)
            .map_err(ScopeViewError::from_rhai_error)?;

        if let Ok(f) = value.as_float() {
            Ok(f)
        } else if let Ok(i) = value.as_int() {
            Ok(i as f64)
        } else {
            Err(ScopeViewError::Overlay(format!(
                "Formula must return a number, got {}",
                value.type_name()
            )))
        }
    }

    /// Evaluate over `samples` evenly spaced points of `[x_min, x_max]`
    ///
    /// Any evaluation error aborts the whole curve. Non-finite values (e.g.
    /// `ln(x)` at `x <= 0`) are dropped from the output.
    pub fn evaluate(&self, x_min: f64, x_max: f64, samples: usize) -> Result<Vec<[f64; 2]>> {
        let mut points = Vec::with_capacity(samples);
        for x in linspace(x_min, x_max, samples) {
            let y = self.eval_at(x)?;
            if y.is_finite() {
                points.push([x, y]);
            }
        }
        Ok(points)
    }
}

impl std::fmt::Debug for MathOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MathOverlay")
            .field("source", &self.source)
            .finish()
    }
}

/// Evenly spaced values including both ends
fn linspace(start: f64, end: f64, samples: usize) -> impl Iterator<Item = f64> {
    let step = if samples > 1 {
        (end - start) / (samples - 1) as f64
    } else {
        0.0
    };
    (0..samples).map(move |i| {
        if samples > 1 && i == samples - 1 {
            end
        } else {
            start + step * i as f64
        }
    })
}

fn configure_engine(engine: &mut Engine) {
    engine.set_max_expr_depths(64, 64);
    engine.set_max_call_levels(16);
    engine.set_max_operations(10_000);
    engine.set_max_string_size(1_000);
    engine.set_max_array_size(1_000);
    engine.set_max_map_size(100);

    // Built-in integer operators are bypassed so the `/` overload below applies
    engine.set_fast_operators(false);
    engine.register_fn("/", |a: INT, b: INT| -> FLOAT { a as FLOAT / b as FLOAT });

    macro_rules! unary {
        ($name:literal, $f:expr) => {{
            let f: fn(FLOAT) -> FLOAT = $f;
            engine.register_fn($name, f);
            engine.register_fn($name, move |v: INT| -> FLOAT { f(v as FLOAT) });
        }};
    }

    unary!("sin", |v| v.sin());
    unary!("cos", |v| v.cos());
    unary!("tan", |v| v.tan());
    unary!("sqrt", |v| v.sqrt());
    unary!("exp", |v| v.exp());
    unary!("log", |v| v.log10());
    unary!("ln", |v| v.ln());
    unary!("abs", |v| v.abs());

    engine.register_fn("power", |a: FLOAT, b: FLOAT| -> FLOAT { a.powf(b) });
    engine.register_fn("power", |a: FLOAT, b: INT| -> FLOAT { a.powf(b as FLOAT) });
    engine.register_fn("power", |a: INT, b: FLOAT| -> FLOAT { (a as FLOAT).powf(b) });
    engine.register_fn("power", |a: INT, b: INT| -> FLOAT { (a as FLOAT).powf(b as FLOAT) });
}
