//! Rendering for the CLI's three output formats: human-readable `report`,
//! machine-readable `json`, and `csv`. Shapes are fixed so downstream
//! tooling can parse them deterministically.

use std::path::Path;

use serde::Serialize;

use mediasim::{Group, Media, MediaKind};

use super::OutputFormat;

#[derive(Serialize)]
struct ScoreJson {
    score: f64,
}

/// Renders a single `score` result.
pub fn print_score(score: f64, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Report => println!("{}", trimmed_percentage(score)),
        OutputFormat::Json => {
            let payload = ScoreJson {
                score: round_to(score, 5),
            };
            println!("{}", serde_json::to_string(&payload)?);
        }
        OutputFormat::Csv => println!("{:.8}", score),
    }
    Ok(())
}

#[derive(Serialize)]
struct SimilarityJson {
    name: String,
    score: f64,
}

#[derive(Serialize)]
struct ComparisonJson {
    name: String,
    similarities: Vec<SimilarityJson>,
}

/// Renders the `files` command's comparison report: for each input, every
/// other input found similar above threshold, sorted by score descending.
pub fn print_comparisons(
    comparisons: &[(String, Vec<(String, f64)>)],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Report => {
            for (name, similarities) in comparisons {
                println!("{name}:");
                for (other, score) in similarities {
                    println!("  {} -> {}", other, trimmed_percentage(*score));
                }
            }
        }
        OutputFormat::Json => {
            let payload: Vec<ComparisonJson> = comparisons
                .iter()
                .map(|(name, similarities)| ComparisonJson {
                    name: name.clone(),
                    similarities: similarities
                        .iter()
                        .map(|(other, score)| SimilarityJson {
                            name: other.clone(),
                            score: round_to(*score, 5),
                        })
                        .collect(),
                })
                .collect();
            println!("{}", serde_json::to_string(&payload)?);
        }
        OutputFormat::Csv => {
            for (name, similarities) in comparisons {
                for (other, score) in similarities {
                    println!("{:.8},{},{}", score, name, other);
                }
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct MediaJson {
    name: String,
    #[serde(rename = "type")]
    kind: &'static str,
    width: u32,
    height: u32,
    size: u64,
    length: u64,
}

impl From<&Media> for MediaJson {
    fn from(m: &Media) -> Self {
        Self {
            name: m.name.clone(),
            kind: match m.kind {
                MediaKind::Image => "image",
                MediaKind::Video => "video",
            },
            width: m.width,
            height: m.height,
            size: m.size,
            length: m.length,
        }
    }
}

/// Renders the `dir` command's grouping report.
pub fn print_groups(groups: &[Group], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Report => {
            for (k, group) in groups.iter().enumerate() {
                println!("Group {}:", k + 1);
                for (i, media) in group.iter().enumerate() {
                    let marker = if i == 0 { "*" } else { " " };
                    println!("{marker} {}", media_info(media));
                }
            }
        }
        OutputFormat::Json => {
            let payload: Vec<Vec<MediaJson>> = groups
                .iter()
                .map(|g| g.iter().map(MediaJson::from).collect())
                .collect();
            println!("{}", serde_json::to_string(&payload)?);
        }
        OutputFormat::Csv => {
            for (k, group) in groups.iter().enumerate() {
                for media in group {
                    println!("Group {},{}", k + 1, media.name);
                }
            }
        }
    }
    Ok(())
}

fn media_info(media: &Media) -> String {
    let megapixels = (media.width as f64 * media.height as f64) / 1_000_000.0;
    match media.kind {
        MediaKind::Image => format!("{} ({}x{}, {:.1}MP)", media.name, media.width, media.height, megapixels),
        MediaKind::Video => format!(
            "{} ({}x{}, {:.1}MP, {}s)",
            media.name, media.width, media.height, megapixels, media.length
        ),
    }
}

/// Renames every member of every group to `group<0Wd>_<original file name>`,
/// `W` being the zero-padded digit width of `groups.len()`. Not idempotent
/// by design: running twice doubles the prefix.
pub fn rename_groups(groups: &[Group]) -> std::io::Result<Vec<(String, String)>> {
    let width = digit_width(groups.len());
    let mut renamed = Vec::new();

    for (k, group) in groups.iter().enumerate() {
        for media in group {
            let path = Path::new(&media.name);
            let parent = path.parent().unwrap_or_else(|| Path::new(""));
            let file_name = path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default();

            let new_name = format!("group{:0width$}_{}", k + 1, file_name, width = width);
            let new_path = parent.join(&new_name);

            std::fs::rename(path, &new_path)?;
            renamed.push((media.name.clone(), new_path.to_string_lossy().to_string()));
        }
    }

    Ok(renamed)
}

fn digit_width(n: usize) -> usize {
    if n < 10 {
        1
    } else {
        (n as f64).log10().floor() as usize + 1
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Formats `score` as a percentage with trailing zeroes trimmed (but never
/// trimming down to a bare trailing dot).
fn trimmed_percentage(score: f64) -> String {
    let pct = format!("{:.3}", score * 100.0);
    let trimmed = pct.trim_end_matches('0');
    let trimmed = trimmed.trim_end_matches('.');
    format!("{trimmed}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_zeroes_but_keeps_significant_digits() {
        assert_eq!(trimmed_percentage(1.0), "100%");
        assert_eq!(trimmed_percentage(0.5), "50%");
        assert_eq!(trimmed_percentage(0.8255), "82.55%");
    }

    #[test]
    fn digit_width_matches_group_count() {
        assert_eq!(digit_width(1), 1);
        assert_eq!(digit_width(9), 1);
        assert_eq!(digit_width(10), 2);
        assert_eq!(digit_width(99), 2);
        assert_eq!(digit_width(100), 3);
    }

    fn dummy_icon() -> mediasim::icon::Icon {
        use image::{DynamicImage, RgbImage};
        mediasim::icon::Icon::build(&DynamicImage::ImageRgb8(RgbImage::new(2, 2)))
    }

    #[test]
    fn rename_is_not_idempotent_running_twice_doubles_the_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        std::fs::write(&a, b"stub").unwrap();
        std::fs::write(&b, b"stub").unwrap();

        let group: Group = vec![
            Media::new(a.to_string_lossy(), MediaKind::Image, vec![dummy_icon()], 1, 1, 1, 0),
            Media::new(b.to_string_lossy(), MediaKind::Image, vec![dummy_icon()], 1, 1, 1, 0),
        ];
        let groups = vec![group];

        let first_pass = rename_groups(&groups).unwrap();
        assert!(first_pass.iter().any(|(_, to)| to.ends_with("group1_a.png")));

        let renamed_group: Group = first_pass
            .iter()
            .map(|(_, to)| {
                Media::new(to.as_str(), MediaKind::Image, vec![dummy_icon()], 1, 1, 1, 0)
            })
            .collect();
        let second_pass = rename_groups(&[renamed_group]).unwrap();
        assert!(second_pass
            .iter()
            .any(|(_, to)| to.ends_with("group1_group1_a.png")));
    }
}
