use clap::Args;
use interest_inventory::error::AppError;
use interest_inventory::inventory::{
    Catalog, Evaluation, Evaluator, Submission, ValidationFailure, ValidationPolicy,
};
use serde_json::json;
use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON submission with `respondent` and `responses` ("R_1": 1..6, ...)
    pub(crate) responses: PathBuf,
    /// Validation policy: free_scale or permutation (defaults to permutation)
    #[arg(long, value_parser = crate::infra::parse_policy)]
    pub(crate) policy: Option<ValidationPolicy>,
    /// Alternate catalog JSON file
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the evaluation as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        responses,
        policy,
        catalog,
        json,
    } = args;

    let catalog = match catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::standard()?,
    };
    let policy = policy.unwrap_or(ValidationPolicy::PermutationPerItem);

    let raw = std::fs::read_to_string(&responses)?;
    let submission: Submission = serde_json::from_str(&raw)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

    let outcome = Evaluator::new(Arc::new(catalog), policy).evaluate(&submission);

    let output = if json {
        render_json(policy, &outcome)?
    } else {
        render_text(policy, &outcome)
    };
    print!("{output}");
    Ok(())
}

fn render_json(
    policy: ValidationPolicy,
    outcome: &Result<Evaluation, Vec<ValidationFailure>>,
) -> Result<String, AppError> {
    let payload = match outcome {
        Ok(evaluation) => json!({ "policy": policy, "evaluation": evaluation }),
        Err(failures) => json!({ "policy": policy, "failures": failures }),
    };
    let mut rendered = serde_json::to_string_pretty(&payload)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    rendered.push('\n');
    Ok(rendered)
}

fn render_text(
    policy: ValidationPolicy,
    outcome: &Result<Evaluation, Vec<ValidationFailure>>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Interest inventory ({})", policy.label());

    let evaluation = match outcome {
        Ok(evaluation) => evaluation,
        Err(failures) => {
            let _ = writeln!(out, "Submission rejected:");
            for failure in failures {
                let _ = writeln!(out, "- {}", failure.summary());
            }
            return out;
        }
    };

    let totals = evaluation
        .totals
        .iter()
        .map(|(category, total)| format!("{} {}", category.code(), total))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "Totals: {totals}");
    let highest = evaluation
        .highest
        .iter()
        .map(|category| category.name())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "Highest: {highest}");

    let _ = writeln!(out, "\nTop categories");
    for entry in evaluation.view.top_categories() {
        let marker = if entry.highlighted { " *" } else { "" };
        let _ = writeln!(
            out,
            "{}. {} ({}) - {}{}",
            entry.rank,
            entry.name,
            entry.category.code(),
            entry.score,
            marker
        );
        for line in entry.description.lines() {
            let _ = writeln!(out, "   {line}");
        }
    }

    let _ = writeln!(out, "\nOther categories");
    for entry in evaluation.view.other_categories() {
        let _ = writeln!(
            out,
            "{}. {} ({}) - {}",
            entry.rank,
            entry.name,
            entry.category.code(),
            entry.score
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use interest_inventory::inventory::{Respondent, ResponseSet};

    fn evaluator(policy: ValidationPolicy) -> Evaluator {
        Evaluator::new(
            Arc::new(Catalog::standard().expect("standard catalog")),
            policy,
        )
    }

    fn submission(grid: [[i32; 6]; 6]) -> Submission {
        Submission {
            respondent: Respondent {
                name: "Lim Wei Jie".to_string(),
                email: Some("weijie@example.com".to_string()),
                institution_code: Some("SMK-1180".to_string()),
            },
            responses: ResponseSet::from_grid(grid),
        }
    }

    #[test]
    fn text_report_lists_top_three_then_the_rest() {
        let grid = [[6, 5, 4, 3, 2, 1]; 6];
        let outcome = evaluator(ValidationPolicy::PermutationPerItem).evaluate(&submission(grid));

        let text = render_text(ValidationPolicy::PermutationPerItem, &outcome);
        assert!(text.contains("Totals: R 36 | I 30 | A 24 | S 18 | E 12 | C 6"));
        assert!(text.contains("Highest: Realistic"));
        assert!(text.contains("1. Realistic (R) - 36 *"));

        let (top, others) = text.split_once("Other categories").expect("two sections");
        assert!(top.contains("3. Artistic (A) - 24"));
        assert!(others.contains("4. Social (S) - 18"));
        assert!(others.contains("6. Conventional (C) - 6"));
    }

    #[test]
    fn text_report_explains_rejections() {
        let outcome =
            evaluator(ValidationPolicy::PermutationPerItem).evaluate(&submission([[4; 6]; 6]));

        let text = render_text(ValidationPolicy::PermutationPerItem, &outcome);
        assert!(text.contains("Submission rejected:"));
        assert!(!text.contains("Totals:"));
    }

    #[test]
    fn json_report_carries_failures() {
        let outcome = evaluator(ValidationPolicy::FreeScale).evaluate(&submission([[0; 6]; 6]));

        let rendered = render_json(ValidationPolicy::FreeScale, &outcome).expect("renders");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");
        assert_eq!(value["policy"], "free_scale");
        assert_eq!(value["failures"][0]["kind"], "out_of_range");
    }
}
