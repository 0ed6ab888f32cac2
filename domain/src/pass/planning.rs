//! Solution identification.

use super::context::Context;
use super::problem::Problem;
use super::rules::ClassificationRules;
use super::solution::Solution;

/// Map a problem to a skill, an approach and a sub-task breakdown.
///
/// Context is accepted for parity with a real planner but the stock
/// decomposition only looks at scope. Returns `None` only when the rule
/// set has no mapping for the problem type, which
/// [`ClassificationRules::validated`] rules out.
pub fn plan_solution(
    problem: &Problem,
    _context: &Context,
    rules: &ClassificationRules,
) -> Option<Solution> {
    let skill_id = rules.skill_for(problem.problem_type)?.to_string();

    let hint = &rules.approval_hint;
    let requires_approval = hint.problem_types.contains(&problem.problem_type)
        || hint.urgencies.contains(&problem.urgency);

    let approach = rules
        .approach_template
        .replace("{skill}", &skill_id)
        .replace("{type}", problem.problem_type.as_str());

    Some(Solution {
        skill_id,
        approach,
        estimated_complexity: problem.scope,
        requires_approval,
        sub_tasks: rules.sub_tasks.for_scope(problem.scope).to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::analysis::analyze_problem;
    use crate::pass::problem::{ProblemType, Scope, Urgency};

    fn rules() -> ClassificationRules {
        ClassificationRules::default().validated().unwrap()
    }

    #[test]
    fn test_skill_table() {
        let expected = [
            (ProblemType::Deployment, "01-deployment-devops"),
            (ProblemType::Creation, "08-web-artifacts-builder"),
            (ProblemType::Analysis, "03-marketing-growth"),
            (ProblemType::Communication, "14-internal-comms"),
            (ProblemType::Task, "06-client-delivery"),
            (ProblemType::Query, "18-legacy-keeper"),
        ];
        for (problem_type, skill) in expected {
            let problem = Problem {
                problem_type,
                intent: String::new(),
                entities: vec![],
                urgency: Urgency::Medium,
                scope: Scope::Simple,
            };
            let solution = plan_solution(&problem, &Context::default(), &rules()).unwrap();
            assert_eq!(solution.skill_id, skill);
        }
    }

    #[test]
    fn test_approval_hint() {
        let rules = rules();
        let deploy = analyze_problem("deploy it", &rules);
        assert!(plan_solution(&deploy, &Context::default(), &rules).unwrap().requires_approval);

        let query = analyze_problem("what time is it", &rules);
        assert!(!plan_solution(&query, &Context::default(), &rules).unwrap().requires_approval);

        let urgent_query = analyze_problem("urgent: what time is it", &rules);
        assert!(
            plan_solution(&urgent_query, &Context::default(), &rules)
                .unwrap()
                .requires_approval
        );
    }

    #[test]
    fn test_approach_and_sub_tasks() {
        let rules = rules();
        let problem = analyze_problem("deploy the new release", &rules);
        let solution = plan_solution(&problem, &Context::default(), &rules).unwrap();
        assert_eq!(
            solution.approach,
            "Use 01-deployment-devops to handle deployment request"
        );
        assert_eq!(solution.estimated_complexity, Scope::Simple);
        assert_eq!(solution.sub_tasks, vec!["Execute primary action"]);
    }
}
