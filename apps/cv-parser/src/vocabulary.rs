//! Fixed-label tables behind skill and role classification.
//!
//! Both classifiers are plain (label, pattern) tables evaluated independently;
//! there is no learning and no ordering between rules. The built-in tables
//! below can be replaced at runtime from a TOML file so that growing the
//! vocabulary does not need a rebuild:
//!
//! ```toml
//! skills = ["Rust", "Kafka"]
//!
//! [[roles]]
//! label = "systems developer"
//! pattern = "rust|embedded|\\bc\\+\\+"
//! ```

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::VocabularyError;

/// Known technology and skill terms, in output order.
pub const DEFAULT_SKILLS: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C++",
    "C#",
    "Golang",
    "Rust",
    "Ruby",
    "PHP",
    "Swift",
    "Kotlin",
    "Dart",
    "Scala",
    "SQL",
    "NoSQL",
    "HTML",
    "CSS",
    "Sass",
    "Tailwind CSS",
    "React",
    "React Native",
    "Next.js",
    "Vue",
    "Angular",
    "Svelte",
    "Redux",
    "Node.js",
    "Express.js",
    "NestJS",
    "Django",
    "Flask",
    "FastAPI",
    "Spring Boot",
    "Laravel",
    "Ruby on Rails",
    ".NET",
    "GraphQL",
    "REST API",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "Firebase",
    "Supabase",
    "AWS",
    "Azure",
    "Google Cloud",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Jenkins",
    "CI/CD",
    "Git",
    "GitHub",
    "Linux",
    "Flutter",
    "Android",
    "iOS",
    "TensorFlow",
    "PyTorch",
    "Pandas",
    "NumPy",
    "Scikit-learn",
    "Machine Learning",
    "Data Analysis",
    "Power BI",
    "Tableau",
    "Figma",
    "Jest",
    "Cypress",
    "Selenium",
    "Agile",
    "Scrum",
    "Jira",
    "Solidity",
    "Blockchain",
];

/// Role category → keyword alternation, matched against lowercased text.
pub const DEFAULT_ROLE_RULES: &[(&str, &str)] = &[
    (
        "frontend developer",
        r"frontend|front-end|front end|react|vue|angular|javascript|typescript|html|css",
    ),
    (
        "backend developer",
        r"backend|back-end|back end|node\.?js|express|django|flask|spring boot|laravel|\bphp\b|ruby on rails|\bapi\b|microservices",
    ),
    ("fullstack developer", r"full[- ]?stack|\bmern\b"),
    (
        "mobile developer",
        r"mobile|android|\bios\b|react native|flutter|swift|kotlin",
    ),
    (
        "data scientist",
        r"data scien|machine learning|deep learning|tensorflow|pytorch|scikit|\bnlp\b",
    ),
    (
        "data analyst",
        r"data analy|power bi|tableau|\bexcel\b|business intelligence",
    ),
    (
        "devops engineer",
        r"devops|ci/cd|docker|kubernetes|terraform|jenkins|ansible",
    ),
    ("cloud engineer", r"\baws\b|azure|\bgcp\b|google cloud|cloud engineer"),
    (
        "ui/ux designer",
        r"\bui\b|\bux\b|figma|adobe xd|user experience|user interface",
    ),
    (
        "qa engineer",
        r"\bqa\b|quality assurance|selenium|cypress|test automation",
    ),
    (
        "cybersecurity analyst",
        r"cybersecurity|cyber security|penetration test|\bsiem\b|\bsoc\b",
    ),
    (
        "product manager",
        r"product manag|product owner|roadmap",
    ),
    ("blockchain developer", r"blockchain|solidity|web3|smart contract"),
];

static BUILTIN: Lazy<Vocabulary> = Lazy::new(|| {
    let skills = DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect();
    let roles = DEFAULT_ROLE_RULES
        .iter()
        .map(|(label, pattern)| RoleRule {
            label: label.to_string(),
            pattern: pattern.to_string(),
        })
        .collect();
    Vocabulary::new(skills, roles).expect("built-in vocabulary tables compile")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRule {
    pub label: String,
    pub pattern: String,
}

/// On-disk shape of a vocabulary override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyFile {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub roles: Vec<RoleRule>,
}

#[derive(Debug, Clone)]
struct Term {
    label: String,
    pattern: Regex,
}

/// Compiled skill and role tables.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    skills: Vec<Term>,
    roles: Vec<Term>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

impl Vocabulary {
    /// Compiles the given tables. Skill terms are matched literally; duplicate
    /// terms (case-insensitive) keep their first position.
    pub fn new(skills: Vec<String>, roles: Vec<RoleRule>) -> Result<Self, VocabularyError> {
        let mut skill_terms: Vec<Term> = Vec::with_capacity(skills.len());
        for skill in skills {
            let skill = skill.trim().to_string();
            if skill.is_empty()
                || skill_terms
                    .iter()
                    .any(|t| t.label.eq_ignore_ascii_case(&skill))
            {
                continue;
            }
            let pattern = Regex::new(&skill_pattern(&skill)).map_err(|source| {
                VocabularyError::InvalidPattern {
                    label: skill.clone(),
                    source,
                }
            })?;
            skill_terms.push(Term {
                label: skill,
                pattern,
            });
        }

        let role_terms = roles
            .into_iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|pattern| Term {
                        label: rule.label.clone(),
                        pattern,
                    })
                    .map_err(|source| VocabularyError::InvalidPattern {
                        label: rule.label,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skills: skill_terms,
            roles: role_terms,
        })
    }

    /// The compiled default tables.
    pub fn builtin() -> &'static Vocabulary {
        &BUILTIN
    }

    /// Parses a TOML override. Sections left out of the file fall back to the
    /// built-in table for that section.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, VocabularyError> {
        let file: VocabularyFile = toml::from_str(toml_str)?;
        let skills = if file.skills.is_empty() {
            DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
        } else {
            file.skills
        };
        let roles = if file.roles.is_empty() {
            Self::builtin().role_rules()
        } else {
            file.roles
        };
        Self::new(skills, roles)
    }

    pub fn load(path: &Path) -> Result<Self, VocabularyError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn skill_labels(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|t| t.label.as_str())
    }

    pub fn role_rules(&self) -> Vec<RoleRule> {
        self.roles
            .iter()
            .map(|t| RoleRule {
                label: t.label.clone(),
                pattern: t.pattern.as_str().to_string(),
            })
            .collect()
    }

    /// Every vocabulary skill that occurs in `text`, in vocabulary order.
    pub fn match_skills(&self, text: &str) -> Vec<String> {
        self.skills
            .iter()
            .filter(|t| t.pattern.is_match(text))
            .map(|t| t.label.clone())
            .collect()
    }

    /// Every role category whose rule matches the lowercased `text`, in
    /// declaration order. Duplicate labels are reported once.
    pub fn match_roles(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut roles: Vec<String> = Vec::new();
        for term in &self.roles {
            if term.pattern.is_match(&lowered) && !roles.contains(&term.label) {
                roles.push(term.label.clone());
            }
        }
        roles
    }
}

/// Case-insensitive literal match that refuses to start or end inside a word,
/// so "Java" does not fire on "JavaScript" while "C++" and ".NET" still work.
fn skill_pattern(term: &str) -> String {
    format!(r"(?i)(?:^|[^\w]){}(?:[^\w]|$)", regex::escape(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM_TOML: &str = r#"
        skills = ["Rust", "Kafka", "rust"]

        [[roles]]
        label = "systems developer"
        pattern = "rust|embedded"
    "#;

    #[test]
    fn test_builtin_compiles() {
        let vocab = Vocabulary::builtin();
        assert_eq!(vocab.skill_labels().count(), DEFAULT_SKILLS.len());
        assert_eq!(vocab.role_rules().len(), DEFAULT_ROLE_RULES.len());
    }

    #[test]
    fn test_skills_follow_vocabulary_order() {
        let text = "Node.js services, a React front end and some Python scripts";
        let skills = Vocabulary::builtin().match_skills(text);
        assert_eq!(skills, vec!["Python", "React", "Node.js"]);
    }

    #[test]
    fn test_skills_case_insensitive_and_canonical() {
        let skills = Vocabulary::builtin().match_skills("worked with POSTGRESQL and docker");
        assert_eq!(skills, vec!["PostgreSQL", "Docker"]);
    }

    #[test]
    fn test_skill_word_boundaries() {
        let vocab = Vocabulary::builtin();
        assert_eq!(vocab.match_skills("JavaScript only"), vec!["JavaScript"]);
        assert!(vocab.match_skills("MySQLite").is_empty());
        assert!(vocab.match_skills("digital").is_empty());
    }

    #[test]
    fn test_skill_metacharacters_escaped() {
        let vocab = Vocabulary::builtin();
        let skills = vocab.match_skills("C++, C# and .NET, deployed via CI/CD");
        assert_eq!(skills, vec!["C++", "C#", ".NET", "CI/CD"]);
        // "Node.js" must not match "Nodexjs" through an unescaped dot
        assert!(vocab.match_skills("Nodexjs").is_empty());
    }

    #[test]
    fn test_skills_idempotent() {
        let vocab = Vocabulary::builtin();
        let text = "Rust, Docker, Kubernetes, React, Rust again";
        let first = vocab.match_skills(text);
        let second = vocab.match_skills(text);
        assert_eq!(first, second);
        assert!(first.iter().all(|s| DEFAULT_SKILLS.contains(&s.as_str())));
    }

    #[test]
    fn test_roles_multi_label_in_declaration_order() {
        let roles = Vocabulary::builtin().match_roles("5 years of React and Node.js with Docker");
        assert_eq!(
            roles,
            vec!["frontend developer", "backend developer", "devops engineer"]
        );
    }

    #[test]
    fn test_roles_none() {
        assert!(Vocabulary::builtin()
            .match_roles("Accountant with a love for spreadsheets")
            .is_empty());
    }

    #[test]
    fn test_custom_toml_replaces_tables() {
        let vocab = Vocabulary::from_toml_str(CUSTOM_TOML).unwrap();
        assert_eq!(vocab.skill_labels().collect::<Vec<_>>(), vec!["Rust", "Kafka"]);
        assert_eq!(
            vocab.match_roles("Embedded firmware in Rust"),
            vec!["systems developer"]
        );
    }

    #[test]
    fn test_toml_without_roles_keeps_builtin_roles() {
        let vocab = Vocabulary::from_toml_str(r#"skills = ["Elixir"]"#).unwrap();
        assert_eq!(vocab.match_skills("Elixir and Phoenix"), vec!["Elixir"]);
        assert_eq!(vocab.match_roles("react"), vec!["frontend developer"]);
    }

    #[test]
    fn test_invalid_role_pattern_rejected() {
        let err = Vocabulary::new(
            vec![],
            vec![RoleRule {
                label: "broken".to_string(),
                pattern: "(unclosed".to_string(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, VocabularyError::InvalidPattern { ref label, .. } if label == "broken"));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(matches!(
            Vocabulary::from_toml_str("skills = ["),
            Err(VocabularyError::Toml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabulary.toml");
        std::fs::write(&path, CUSTOM_TOML).unwrap();
        let vocab = Vocabulary::load(&path).unwrap();
        assert_eq!(vocab.match_skills("Kafka streams"), vec!["Kafka"]);
    }
}
