//! Problem analysis: keyword heuristics over case-normalized text.

use super::problem::Problem;
use super::rules::ClassificationRules;
use crate::core::string::{contains_keyword, contains_phrase, word_count};

/// Classify a command. Pure and deterministic for identical input.
///
/// Blank or unrecognisable text falls back to the rule set's defaults
/// rather than failing.
pub fn analyze_problem(command: &str, rules: &ClassificationRules) -> Problem {
    let lower = command.to_lowercase();

    let problem_type = rules
        .type_rules
        .iter()
        .find(|rule| {
            rule.keywords.iter().any(|k| contains_keyword(&lower, k))
                || rule.words.iter().any(|w| contains_phrase(&lower, w))
        })
        .map(|rule| rule.problem_type)
        .unwrap_or(rules.default_type);

    let urgency = rules
        .urgency_rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| contains_keyword(&lower, k)))
        .map(|rule| rule.urgency)
        .unwrap_or(rules.default_urgency);

    Problem {
        problem_type,
        intent: command.to_string(),
        entities: extract_entities(command),
        urgency,
        scope: rules.scope.scope_for(word_count(command)),
    }
}

/// Capitalized tokens longer than one character, in order of appearance.
///
/// A heuristic stand-in for entity extraction; recall is not guaranteed.
/// Surrounding punctuation is stripped before the length check.
pub fn extract_entities(command: &str) -> Vec<String> {
    command
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| {
            token.chars().count() > 1 && token.chars().next().is_some_and(char::is_uppercase)
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::problem::{ProblemType, Scope, Urgency};

    fn rules() -> ClassificationRules {
        ClassificationRules::default().validated().unwrap()
    }

    #[test]
    fn test_urgent_deploy() {
        let problem = analyze_problem("urgent: deploy the new release", &rules());
        assert_eq!(problem.problem_type, ProblemType::Deployment);
        assert_eq!(problem.urgency, Urgency::Critical);
        assert_eq!(problem.scope, Scope::Simple);
        assert_eq!(problem.intent, "urgent: deploy the new release");
    }

    #[test]
    fn test_type_precedence() {
        // "build" (deployment) outranks "create" (creation)
        let problem = analyze_problem("create and build the site", &rules());
        assert_eq!(problem.problem_type, ProblemType::Deployment);

        let problem = analyze_problem("generate a review report", &rules());
        assert_eq!(problem.problem_type, ProblemType::Creation);

        let problem = analyze_problem("Review the Q3 numbers", &rules());
        assert_eq!(problem.problem_type, ProblemType::Analysis);

        let problem = analyze_problem("send a message to the team", &rules());
        assert_eq!(problem.problem_type, ProblemType::Communication);

        let problem = analyze_problem("please run the nightly job", &rules());
        assert_eq!(problem.problem_type, ProblemType::Task);
    }

    #[test]
    fn test_short_task_words_need_boundaries() {
        let problem = analyze_problem("where is the document", &rules());
        assert_eq!(problem.problem_type, ProblemType::Query);

        let problem = analyze_problem("do the thing", &rules());
        assert_eq!(problem.problem_type, ProblemType::Task);
    }

    #[test]
    fn test_defaults_for_blank_text() {
        let problem = analyze_problem("   ", &rules());
        assert_eq!(problem.problem_type, ProblemType::Query);
        assert_eq!(problem.urgency, Urgency::Medium);
        assert_eq!(problem.scope, Scope::Simple);
        assert!(problem.entities.is_empty());
    }

    #[test]
    fn test_urgency_levels() {
        assert_eq!(analyze_problem("ASAP please", &rules()).urgency, Urgency::Critical);
        assert_eq!(
            analyze_problem("an important question", &rules()).urgency,
            Urgency::High
        );
    }

    #[test]
    fn test_scope_by_word_count() {
        let moderate = "one two three four five six seven eight nine ten eleven";
        assert_eq!(analyze_problem(moderate, &rules()).scope, Scope::Moderate);

        let complex = vec!["word"; 21].join(" ");
        assert_eq!(analyze_problem(&complex, &rules()).scope, Scope::Complex);
    }

    #[test]
    fn test_extract_entities() {
        let entities = extract_entities("Ship Atlas to Acme, then tell Bo and I.");
        assert_eq!(entities, vec!["Ship", "Atlas", "Acme", "Bo"]);
    }

    #[test]
    fn test_deterministic() {
        let a = analyze_problem("Important: email Dana the Roadmap", &rules());
        let b = analyze_problem("Important: email Dana the Roadmap", &rules());
        assert_eq!(a, b);
    }
}
