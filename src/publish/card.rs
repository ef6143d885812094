//! Dataset card (`README.md`) for the hub repository.
//!
//! The YAML front matter declares one `configs` entry for the default upload
//! and one per version, so every version stays loadable by name.

use crate::version::VersionMetadata;
use std::fmt::Write as _;

const LICENSE_LINK: &str =
    "https://github.com/selimfirat/bilkent-turkish-writings-dataset/blob/main/LICENSE";
const SOURCE_URL: &str = "https://stars.bilkent.edu.tr/turkce/";

/// Everything the card is rendered from.
#[derive(Debug, Clone)]
pub struct CardContext<'a> {
    pub repo_id: &'a str,
    pub dataset_name: &'a str,
    /// The version uploaded as the default configuration.
    pub default_version: &'a VersionMetadata,
    /// Every version with a named configuration, ascending.
    pub versions: &'a [VersionMetadata],
}

/// Hub size bucket for `n` rows.
pub fn size_category(n: usize) -> &'static str {
    match n {
        0..=999 => "n<1K",
        1_000..=9_999 => "1K<n<10K",
        10_000..=99_999 => "10K<n<100K",
        100_000..=999_999 => "100K<n<1M",
        _ => "n>1M",
    }
}

/// Render the dataset card.
pub fn dataset_card(ctx: &CardContext<'_>) -> String {
    let default = ctx.default_version;
    let entries = default
        .num_entries
        .map(|n| n.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let title = format!("Compilation of {}", ctx.dataset_name);

    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("license: other\n");
    out.push_str("license_name: \"academic-use-only\"\n");
    let _ = writeln!(out, "license_link: \"{LICENSE_LINK}\"");
    out.push_str("language:\n- tr\n");
    let _ = writeln!(
        out,
        "size_categories:\n- {}",
        size_category(default.num_entries.unwrap_or(0))
    );
    out.push_str("task_categories:\n- text-generation\n- text-classification\n- feature-extraction\n");
    let _ = writeln!(out, "pretty_name: \"{title}\"");
    out.push_str("tags:\n- turkish\n- creative-writing\n- educational\n- nlp\n- corpus\n");
    out.push_str("configs:\n");
    push_config(&mut out, "default", "data/train.csv");
    for v in ctx.versions {
        push_config(&mut out, &v.version, &format!("{}/train.csv", v.version));
    }
    out.push_str("---\n\n");

    let _ = writeln!(out, "# {title}\n");
    out.push_str("## Dataset Description\n\n");
    let _ = writeln!(
        out,
        "Turkish creative writings by students of the Turkish 101 and 102 courses, \
         extracted from the published PDF documents. This release contains \
         **{entries} writings**.\n"
    );

    out.push_str("## Dataset Information\n\n");
    let _ = writeln!(out, "- **Version**: {}", default.version);
    let _ = writeln!(out, "- **Date Created**: {}", default.date_created);
    let _ = writeln!(out, "- **Number of Entries**: {entries}");
    out.push_str("- **Language**: Turkish\n");
    out.push_str("- **License**: Academic Use Only\n");
    let _ = writeln!(out, "- **Original Source**: <{SOURCE_URL}>\n");

    out.push_str("## Data Fields\n\n");
    out.push_str("- **text**: the full text content of the writing\n\n");
    out.push_str("The dataset has a single `train` split; create your own splits as needed.\n\n");

    out.push_str("## Usage\n\n```python\nfrom datasets import load_dataset\n\n");
    let _ = writeln!(
        out,
        "# Latest version ({})\ndataset = load_dataset(\"{}\")",
        default.version, ctx.repo_id
    );
    if let Some(first) = ctx.versions.first() {
        let _ = writeln!(
            out,
            "\n# A specific version\ndataset_{0} = load_dataset(\"{1}\", \"{0}\")",
            first.version, ctx.repo_id
        );
    }
    out.push_str("```\n\n");

    out.push_str("## Versions\n\n");
    let _ = writeln!(
        out,
        "- **default**: same data as {} (recommended)",
        default.version
    );
    for v in ctx.versions {
        let count = v
            .num_entries
            .map(|n| format!("{n} entries"))
            .unwrap_or_else(|| "entry count unknown".to_string());
        let _ = writeln!(out, "- **{}**: {}, created {}", v.version, count, v.date_created);
    }
    out.push('\n');

    out.push_str("## License\n\n");
    let _ = writeln!(
        out,
        "Released for academic use only; commercial use is prohibited. See the [LICENSE]({LICENSE_LINK})."
    );
    out
}

fn push_config(out: &mut String, name: &str, path: &str) {
    let _ = writeln!(
        out,
        "- config_name: {name}\n  data_files:\n  - split: train\n    path: {path}"
    );
}
