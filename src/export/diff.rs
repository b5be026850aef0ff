//! Before/after diffs of an export

use serde::{Deserialize, Serialize};

use super::entries::ConfigEntry;

/// Lines of unchanged context around each hunk
const CONTEXT_LINES: usize = 3;

/// How export changes are presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStyle {
    /// Line diff of the serialized config
    #[default]
    Unified,
    /// Entry-level diff of the two descriptor sets
    Structured,
}

impl std::str::FromStr for DiffStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unified" => Ok(DiffStyle::Unified),
            "structured" => Ok(DiffStyle::Structured),
            other => Err(format!("Unknown diff style: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal(usize, usize),
    Delete(usize),
    Insert(usize),
}

/// Shortest edit script between two line lists via longest common subsequence
fn edit_script(old: &[&str], new: &[&str]) -> Vec<Op> {
    let (n, m) = (old.len(), new.len());
    // lcs[i][j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            ops.push(Op::Equal(i, j));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            ops.push(Op::Delete(i));
            i += 1;
        } else {
            ops.push(Op::Insert(j));
            j += 1;
        }
    }
    ops.extend((i..n).map(Op::Delete));
    ops.extend((j..m).map(Op::Insert));
    ops
}

/// Git-style unified diff of two texts, empty when they are equal
pub fn unified_diff(path: &str, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();
    let ops = edit_script(&old, &new);

    let changes: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| !matches!(op, Op::Equal(..)))
        .map(|(idx, _)| idx)
        .collect();
    if changes.is_empty() {
        return String::new();
    }

    // Group changes whose context windows touch into hunks of op ranges
    let mut hunks: Vec<(usize, usize)> = Vec::new();
    for &idx in &changes {
        let start = idx.saturating_sub(CONTEXT_LINES);
        let end = (idx + CONTEXT_LINES + 1).min(ops.len());
        match hunks.last_mut() {
            Some((_, last_end)) if start <= *last_end => *last_end = end,
            _ => hunks.push((start, end)),
        }
    }

    let mut out = format!("diff --git a/{0} b/{0}\n--- a/{0}\n+++ b/{0}\n", path);
    for (start, end) in hunks {
        let (old_before, new_before) = lines_before(&ops[..start]);
        let hunk = &ops[start..end];
        let old_count = hunk.iter().filter(|op| !matches!(op, Op::Insert(_))).count();
        let new_count = hunk.iter().filter(|op| !matches!(op, Op::Delete(_))).count();
        let old_start = if old_count == 0 { old_before } else { old_before + 1 };
        let new_start = if new_count == 0 { new_before } else { new_before + 1 };

        out.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            old_start, old_count, new_start, new_count
        ));
        for op in hunk {
            match *op {
                Op::Equal(i, _) => push_line(&mut out, ' ', old[i]),
                Op::Delete(i) => push_line(&mut out, '-', old[i]),
                Op::Insert(j) => push_line(&mut out, '+', new[j]),
            }
        }
    }
    out
}

fn lines_before(ops: &[Op]) -> (usize, usize) {
    ops.iter().fold((0, 0), |(old, new), op| match op {
        Op::Equal(..) => (old + 1, new + 1),
        Op::Delete(_) => (old + 1, new),
        Op::Insert(_) => (old, new + 1),
    })
}

fn push_line(out: &mut String, marker: char, line: &str) {
    out.push(marker);
    out.push_str(line);
    out.push('\n');
}

/// Entry-level diff: removed entries then added entries, each sorted
pub fn structured_diff(base: &[ConfigEntry], new: &[ConfigEntry]) -> String {
    let mut remaining: Vec<&ConfigEntry> = new.iter().collect();
    let mut removed = Vec::new();
    for entry in base {
        match remaining.iter().position(|e| *e == entry) {
            Some(pos) => {
                remaining.remove(pos);
            }
            None => removed.push(entry.to_string()),
        }
    }
    let mut added: Vec<String> = remaining.iter().map(|e| e.to_string()).collect();
    removed.sort();
    added.sort();

    let mut out = String::new();
    for line in removed {
        push_line(&mut out, '-', &line);
    }
    for line in added {
        push_line(&mut out, '+', &line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_texts_have_no_diff() {
        assert_eq!(unified_diff("k.json", "a\nb\n", "a\nb\n"), "");
    }

    #[test]
    fn test_single_change_hunk() {
        let before = "1\n2\n3\n4\n5\n6\n7\n8\n9\n";
        let after = "1\n2\n3\n4\nfive\n6\n7\n8\n9\n";
        let diff = unified_diff("keybindings.json", before, after);
        let expected = "\
diff --git a/keybindings.json b/keybindings.json
--- a/keybindings.json
+++ b/keybindings.json
@@ -2,7 +2,7 @@
 2
 3
 4
-5
+five
 6
 7
 8
";
        assert_eq!(diff, expected);
    }

    #[test]
    fn test_distant_changes_make_two_hunks() {
        let before: String = (1..=20).map(|n| format!("{}\n", n)).collect();
        let after: String = (1..=20)
            .map(|n| match n {
                2 => "two\n".to_string(),
                18 => "eighteen\n".to_string(),
                _ => format!("{}\n", n),
            })
            .collect();
        let diff = unified_diff("f", &before, &after);
        assert_eq!(diff.matches("@@ -").count(), 2);
        assert!(diff.contains("@@ -1,5 +1,5 @@"));
        assert!(diff.contains("@@ -15,6 +15,6 @@"));
    }

    #[test]
    fn test_insert_into_empty() {
        let diff = unified_diff("f", "", "a\nb\n");
        assert!(diff.contains("@@ -0,0 +1,2 @@\n+a\n+b\n"));
    }

    #[test]
    fn test_structured_diff() {
        let base = vec![
            ConfigEntry::new("cmd+c", "copy"),
            ConfigEntry::new("cmd+v", "paste"),
        ];
        let new = vec![
            ConfigEntry::new("cmd+v", "paste"),
            ConfigEntry::new("cmd+s", "save"),
            ConfigEntry::new("cmd+a", "selectAll"),
        ];
        assert_eq!(
            structured_diff(&base, &new),
            "-cmd+c => copy\n+cmd+a => selectAll\n+cmd+s => save\n"
        );
        assert_eq!(structured_diff(&new, &new), "");
    }

    #[test]
    fn test_diff_style_parse() {
        assert_eq!("Structured".parse::<DiffStyle>(), Ok(DiffStyle::Structured));
        assert!("side-by-side".parse::<DiffStyle>().is_err());
    }
}
