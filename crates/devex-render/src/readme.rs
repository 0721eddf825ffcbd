//! README generation.

use std::collections::BTreeMap;

use devex_model::{Directory, ImpactKey};

const REPO_URL: &str = "https://github.com/nikola/awesome-devex-growth";
const BACK_TO_TOP: &str = "[↑ Back to top](#contents)";

/// Render the README for `directory`. Logos are not used, so the raw model works.
pub fn render_readme(directory: &Directory) -> String {
    let mut readme = String::new();

    push_header(&mut readme, directory);
    push_contents(&mut readme, directory);
    push_legend(&mut readme, directory);

    for category in &directory.categories {
        readme.push_str(&format!("## {}\n\n{}\n\n", category.name, BACK_TO_TOP));

        for company in &category.companies {
            readme.push_str(&format!("### [{}]({})\n", company.name, company.link));
            readme.push_str(&format!(
                "**Impact:** {} **Evidence:** [{}]({})\n",
                directory.impact_symbol(&company.impact),
                company.evidence,
                company.evidence_link
            ));
            readme.push_str("**Key Features:**\n");
            for feature in &company.key_features {
                readme.push_str(&format!("- {}\n", feature));
            }
            readme.push_str(&format!("**Why it's awesome:** {}\n\n", company.why_awesome));
        }
    }

    push_evidence(&mut readme, directory);
    push_contributing(&mut readme);

    for (label, names) in company_index(directory) {
        readme.push_str(&format!("**{}:** {}  \n", label, names.join(", ")));
    }

    readme.push_str(&format!("\n{}\n", BACK_TO_TOP));
    push_footer(&mut readme);

    readme
}

/// Group every company name by uppercased first letter.
///
/// The key is one char even when uppercasing expands it (`ß` groups under `S`).
///
/// Names are not deduplicated. Each group is labelled with a short range running
/// to the last of the next two populated letters, or the letter alone if none follow.
pub fn company_index(directory: &Directory) -> Vec<(String, Vec<&str>)> {
    let mut names: Vec<&str> = directory.companies().map(|c| c.name.as_str()).collect();
    names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));

    let mut groups: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for name in names {
        let letter = name
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .map(String::from)
            .unwrap_or_default();
        groups.entry(letter).or_default().push(name);
    }

    let letters: Vec<String> = groups.keys().cloned().collect();

    letters
        .iter()
        .enumerate()
        .map(|(i, letter)| {
            let label = match letters[i + 1..].iter().take(2).last() {
                Some(last) => format!("{}-{}", letter, last),
                None => letter.clone(),
            };
            let names = groups.remove(letter).unwrap_or_default();
            (label, names)
        })
        .collect()
}

fn push_header(readme: &mut String, directory: &Directory) {
    let popular: Vec<&str> = directory
        .categories
        .iter()
        .flat_map(|cat| cat.companies.iter().take(2).map(|c| c.name.as_str()))
        .collect();

    let by_impact: Vec<String> = ImpactKey::ALL
        .iter()
        .map(|key| format!("{} ({})", directory.impact_symbol(key.as_str()), key.tip_label()))
        .collect();

    readme.push_str(&format!(
        "# {heading} [![Awesome](https://awesome.re/badge.svg)](https://awesome.re) \
[![Total Examples](https://img.shields.io/badge/examples-{total}-brightgreen.svg)](#contents) \
[![Last Updated](https://img.shields.io/github/last-commit/nikola/awesome-devex-growth.svg)](#contents)

> {subtitle}

{description}

📖 **See [DEFINITIONS.md](DEFINITIONS.md) for impact levels, evidence requirements, and submission guidelines.**

## Quick Search Tips
💡 Use GitHub's search or Ctrl+F to find companies quickly\x20\x20
🏢 **Popular companies:** {popular}\x20\x20
🏷️ **By impact:** {by_impact}

## Contents

",
        heading = directory.title.heading,
        total = directory.total_companies(),
        subtitle = directory.title.subtitle,
        description = directory.metadata.description,
        popular = popular.join(", "),
        by_impact = by_impact.join(" · "),
    ));
}

fn push_contents(readme: &mut String, directory: &Directory) {
    for category in &directory.categories {
        readme.push_str(&format!("- [{}](#{})\n", category.name, category.id));
    }
    readme.push_str("- [Growth Evidence & Case Studies](#growth-evidence--case-studies)\n");
    readme.push_str("- [Research & Metrics](#research--metrics)\n");
}

fn push_legend(readme: &mut String, directory: &Directory) {
    readme.push_str("\n## Legend\n\n");

    for key in ImpactKey::ALL {
        if let Some(level) = directory.impact_level(key.as_str()) {
            readme.push_str(&format!(
                "- {} **{}** - {}\n",
                level.symbol, level.name, level.description
            ));
        }
    }

    readme.push_str(&format!("\n{}\n\n---\n\n", BACK_TO_TOP));
}

fn push_evidence(readme: &mut String, directory: &Directory) {
    readme.push_str(&format!(
        "## Growth Evidence & Case Studies\n\n{}\n\n### Business Impact Research\n",
        BACK_TO_TOP
    ));
    for link in &directory.research_links {
        readme.push_str(&format!("- [{}]({})\n", link.title, link.url));
    }

    readme.push_str("\n### Developer Productivity Studies\n");
    for study in &directory.case_studies {
        readme.push_str(&format!("- [{}]({})\n", study.title, study.url));
    }

    readme.push_str(&format!(
        "\n## Research & Metrics\n\n{}\n\n### DevEx Frameworks\n",
        BACK_TO_TOP
    ));
    for framework in &directory.frameworks {
        readme.push_str(&format!(
            "- [{} ({})]({})\n",
            framework.name, framework.source, framework.url
        ));
    }

    readme.push_str("\n### Industry Reports\n");
    for report in &directory.reports {
        readme.push_str(&format!("- [{}]({})\n", report.name, report.url));
    }
}

fn push_contributing(readme: &mut String) {
    readme.push_str(&format!(
        "
---

## Contributing

{BACK_TO_TOP}

See our [contributing guidelines](CONTRIBUTING.md) and [definitions](DEFINITIONS.md) for information on how to add examples.

We especially welcome:
- 📊 Quantified growth metrics
- 🔗 Case studies with business impact
- 🏢 Company submissions showcasing their DevEx
- 📱 Social proof (tweets, blog posts, testimonials)

## Company Index

"
    ));
}

fn push_footer(readme: &mut String) {
    readme.push_str(&format!(
        "
## Maintainers

This repository is maintained by the community. For questions or suggestions, please [open an issue]({REPO_URL}/issues).

## License

[![CC0](http://mirrors.creativecommons.org/presskit/buttons/88x31/svg/cc-zero.svg)](https://creativecommons.org/publicdomain/zero/1.0/)

To the extent possible under law, the contributors have waived all copyright and related rights to this work.
"
    ));
}
