//! Interactive terminal form
//!
//! Collects the five property attributes, shows an overview, and predicts
//! only when the user explicitly asks for it.

use crate::error::ModelError;
use crate::types::property::{FieldSpec, PropertyInputs, FIELDS};
use crate::types::valuation::{format_currency, format_thousands, PredictionResult};
use anyhow::Result;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

/// What the user chose after reviewing the inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Predict,
    Quit,
}

/// Line-oriented valuation form over any reader and writer
pub struct ValuationForm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ValuationForm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run form sessions until the user quits or input ends.
    ///
    /// Returns the number of valuations shown. A prediction error is shown
    /// to the user and then returned; the form does not continue past it.
    pub fn run<F>(&mut self, mut predict: F) -> Result<usize>
    where
        F: FnMut(&PropertyInputs) -> std::result::Result<PredictionResult, ModelError>,
    {
        self.header()?;
        let mut valuations = 0;

        loop {
            let Some(inputs) = self.read_inputs()? else {
                debug!("Input ended while reading fields");
                break;
            };

            self.overview(&inputs)?;

            if self.read_trigger()? == Trigger::Quit {
                break;
            }

            match predict(&inputs) {
                Ok(result) => {
                    self.show_result(&result)?;
                    valuations += 1;
                }
                Err(e) => {
                    writeln!(self.output, "\n  Prediction unavailable: {}", e)?;
                    self.output.flush()?;
                    return Err(e.into());
                }
            }

            if !self.read_yes("\nValue another property? [y/N]: ")? {
                break;
            }
        }

        self.footer()?;
        info!(valuations, "Form session finished");
        Ok(valuations)
    }

    fn header(&mut self) -> io::Result<()> {
        writeln!(self.output, "🏠 AI Housing Price Predictor")?;
        writeln!(self.output, "Smart house price estimation using Machine Learning")?;
        writeln!(self.output, "{}", "-".repeat(52))?;
        writeln!(self.output, "📊 Property Inputs")?;
        writeln!(self.output, "Enter details to predict house price (blank keeps the default)")?;
        Ok(())
    }

    fn footer(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n{}", "-".repeat(52))?;
        writeln!(self.output, "🚀 About This Project")?;
        writeln!(
            self.output,
            "AI-powered house price prediction system built using Machine Learning & Rust."
        )?;
        self.output.flush()
    }

    /// Read all five fields; `None` if input ends first
    fn read_inputs(&mut self) -> io::Result<Option<PropertyInputs>> {
        let mut values = [0.0; 5];
        for (slot, field) in values.iter_mut().zip(FIELDS.iter()) {
            match self.read_field(field)? {
                Some(value) => *slot = value,
                None => return Ok(None),
            }
        }
        Ok(Some(PropertyInputs::from_values(values)))
    }

    /// Prompt until the user gives a number or a blank line.
    ///
    /// Out-of-range numbers are clamped into the field's domain.
    fn read_field(&mut self, field: &FieldSpec) -> io::Result<Option<f64>> {
        loop {
            write!(
                self.output,
                "{} [{} - {}, default {}]: ",
                field.label,
                plain(field.min),
                plain(field.max),
                plain(field.default)
            )?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line.is_empty() {
                return Ok(Some(field.default));
            }

            let value = match line.replace(',', "").parse::<f64>() {
                Ok(value) if value.is_finite() => value,
                _ => {
                    writeln!(self.output, "  '{}' is not a number, try again", line)?;
                    continue;
                }
            };

            if !field.contains(value) {
                let clamped = field.clamp(value);
                writeln!(
                    self.output,
                    "  {} is outside {} - {}, using {}",
                    plain(value),
                    plain(field.min),
                    plain(field.max),
                    plain(clamped)
                )?;
                return Ok(Some(clamped));
            }

            return Ok(Some(value));
        }
    }

    fn overview(&mut self, inputs: &PropertyInputs) -> io::Result<()> {
        writeln!(self.output, "\n🏘️ Property Overview")?;
        writeln!(
            self.output,
            "  💰 Income Level: ${}",
            format_thousands(inputs.average_area_income)
        )?;
        writeln!(
            self.output,
            "  🏠 House Age: {} years",
            plain(inputs.average_house_age)
        )?;
        writeln!(
            self.output,
            "  🛏️ Rooms / Bedrooms: {} / {}",
            plain(inputs.number_of_rooms),
            plain(inputs.number_of_bedrooms)
        )?;
        writeln!(
            self.output,
            "  👥 Population: {}",
            format_thousands(inputs.area_population)
        )?;
        Ok(())
    }

    fn read_trigger(&mut self) -> io::Result<Trigger> {
        write!(self.output, "\n🔮 Press Enter to predict house price, q to quit: ")?;
        self.output.flush()?;

        Ok(match self.read_line()? {
            Some(line) if line.eq_ignore_ascii_case("q") => Trigger::Quit,
            Some(_) => Trigger::Predict,
            None => Trigger::Quit,
        })
    }

    fn show_result(&mut self, result: &PredictionResult) -> io::Result<()> {
        writeln!(self.output, "\n📈 Prediction Result")?;
        writeln!(self.output, "  Estimated Price: {}", format_currency(result.estimate))?;
        writeln!(self.output, "  {}", result.tier)?;
        self.output.flush()
    }

    fn read_yes(&mut self, prompt: &str) -> io::Result<bool> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        Ok(matches!(
            self.read_line()?.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }

    /// Next trimmed line, `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Whole numbers without decimals, everything else as-is
fn plain(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::valuation::PriceTier;
    use std::io::Cursor;

    fn run_form<F>(script: &str, predict: F) -> (Result<usize>, String)
    where
        F: FnMut(&PropertyInputs) -> std::result::Result<PredictionResult, ModelError>,
    {
        let mut output = Vec::new();
        let result = ValuationForm::new(Cursor::new(script.as_bytes()), &mut output).run(predict);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_defaults_then_predict() {
        let mut seen = Vec::new();
        let (result, output) = run_form("\n\n\n\n\n\nn\n", |inputs| {
            seen.push(*inputs);
            Ok(PredictionResult::new(750_000.0))
        });

        assert_eq!(result.unwrap(), 1);
        assert_eq!(seen, vec![PropertyInputs::default()]);
        assert!(output.contains("💰 Income Level: $50,000"));
        assert!(output.contains("👥 Population: 30,000"));
        assert!(output.contains("Estimated Price: $750,000.00"));
        assert!(output.contains("Mid-Range Housing"));
    }

    #[test]
    fn test_footer_after_session() {
        let (result, output) = run_form("\n\n\n\n\nq\n", |_| panic!("predicted without trigger"));

        assert_eq!(result.unwrap(), 0);
        let about = output.find("🚀 About This Project").unwrap();
        assert!(about > output.find("Property Overview").unwrap());

        let (_, output) = run_form("\n\n\n\n\n\n\n", |_| Ok(PredictionResult::new(1.0)));
        assert!(output.find("🚀 About This Project").unwrap() > output.find("Estimated Price").unwrap());
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let mut seen = Vec::new();
        let (result, output) = run_form("250000\n0\n\n9\n\n\n", |inputs| {
            seen.push(*inputs);
            Ok(PredictionResult::new(1_500_000.0))
        });

        assert_eq!(result.unwrap(), 1);
        assert!(output.contains("250000 is outside 10000 - 200000, using 200000"));
        assert_eq!(seen[0].average_area_income, 200_000.0);
        assert_eq!(seen[0].average_house_age, 1.0);
        assert_eq!(seen[0].number_of_bedrooms, 6.0);
        assert!(output.contains(PriceTier::Luxury.label()));
    }

    #[test]
    fn test_invalid_number_reprompts() {
        let mut seen = Vec::new();
        let (result, output) = run_form("lots\n75,000\n\n\n\n\n\n", |inputs| {
            seen.push(*inputs);
            Ok(PredictionResult::new(250_000.0))
        });

        assert_eq!(result.unwrap(), 1);
        assert!(output.contains("'lots' is not a number"));
        assert_eq!(seen[0].average_area_income, 75_000.0);
        assert!(output.contains("Affordable Housing"));
    }

    #[test]
    fn test_no_prediction_without_trigger() {
        let (result, _) = run_form("\n\n\n\n\nq\n", |_| panic!("predicted without trigger"));
        assert_eq!(result.unwrap(), 0);

        let (result, _) = run_form("\n\n", |_| panic!("predicted without trigger"));
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_multiple_valuations() {
        let mut calls = 0;
        let (result, _) = run_form("\n\n\n\n\n\ny\n\n\n\n\n\n\nn\n", |_| {
            calls += 1;
            Ok(PredictionResult::new(600_000.0))
        });

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_prediction_error_ends_session() {
        let (result, output) = run_form("\n\n\n\n\n\ny\n", |_| Err(ModelError::ModelUnavailable));

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModelError>(),
            Some(ModelError::ModelUnavailable)
        ));
        assert!(output.contains("Prediction unavailable"));
    }

    #[test]
    fn test_plain_formatting() {
        assert_eq!(plain(5.0), "5");
        assert_eq!(plain(7.5), "7.5");
    }
}
