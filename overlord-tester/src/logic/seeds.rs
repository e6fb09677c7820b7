use anyhow::{Context, Result, bail, ensure};
use std::collections::HashSet;

const DEFAULT_SEED: u64 = 1337;
const MAX_RANGE_LEN: u64 = 100_000;

#[must_use]
pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Resolve CLI seed tokens into a deduplicated, ordered seed list.
///
/// Supports literal integers (negative values use their magnitude),
/// half-open ranges `a..b` and inclusive ranges `a..=b`.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        for seed in expand_token(token)? {
            if seen.insert(seed) {
                seeds.push(seed);
            }
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn expand_token(token: &str) -> Result<Vec<u64>> {
    if let Some((start, end)) = token.split_once("..") {
        let (end, inclusive) = end
            .strip_prefix('=')
            .map_or((end, false), |rest| (rest, true));
        let start = parse_seed(start).with_context(|| format!("bad range start in {token}"))?;
        let end = parse_seed(end).with_context(|| format!("bad range end in {token}"))?;
        let end = if inclusive {
            end.checked_add(1)
                .with_context(|| format!("range {token} overflows"))?
        } else {
            end
        };
        ensure!(start < end, "empty seed range: {token}");
        ensure!(
            end - start <= MAX_RANGE_LEN,
            "seed range {token} exceeds {MAX_RANGE_LEN} seeds"
        );
        return Ok((start..end).collect());
    }

    Ok(vec![parse_seed(token)?])
}

fn parse_seed(raw: &str) -> Result<u64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }
    bail!("Unrecognized seed token: {raw}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &str) -> Vec<String> {
        split_csv(raw)
    }

    #[test]
    fn split_csv_trims_and_filters() {
        assert_eq!(split_csv(" alpha, ,beta,  gamma "), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn resolves_numbers_and_ranges() {
        let seeds = resolve_seed_inputs(&tokens("42, -7, 1..4, 10..=11")).unwrap();
        assert_eq!(seeds, vec![42, 7, 1, 2, 3, 10, 11]);
    }

    #[test]
    fn deduplicates_in_first_seen_order() {
        let seeds = resolve_seed_inputs(&tokens("3, 1..5, 3")).unwrap();
        assert_eq!(seeds, vec![3, 1, 2, 4]);
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_garbage_and_backwards_ranges() {
        assert!(resolve_seed_inputs(&tokens("duck")).is_err());
        assert!(resolve_seed_inputs(&tokens("5..5")).is_err());
        assert!(resolve_seed_inputs(&tokens("0..1000000")).is_err());
    }
}
