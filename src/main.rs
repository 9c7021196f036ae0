use anyhow::{Context as _, bail};
use spinquad::flow::{self, RunConfig};

/// Parse the single recognized option: the requested tile count.
///
/// Defaults to 4 when absent. The scene floor-divides the value by 4
/// before use, so requests below 4 disable tiling.
fn parse_tiles<I: Iterator<Item = String>>(mut args: I) -> anyhow::Result<u32> {
    let tiles = match args.next() {
        None => 4,
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("invalid tile count {raw:?}, expected a non-negative integer"))?,
    };
    if args.next().is_some() {
        bail!("usage: spinquad [TILES]");
    }
    Ok(tiles)
}

fn main() -> anyhow::Result<()> {
    let tiling_request = parse_tiles(std::env::args().skip(1))?;

    flow::run(RunConfig {
        tiling_request,
        ..RunConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<u32> {
        parse_tiles(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn tile_count_defaults_to_four() {
        assert_eq!(parse(&[]).unwrap(), 4);
    }

    #[test]
    fn tile_count_is_taken_verbatim() {
        assert_eq!(parse(&["16"]).unwrap(), 16);
        assert_eq!(parse(&["0"]).unwrap(), 0);
    }

    #[test]
    fn rejects_non_numeric_and_negative_counts() {
        assert!(parse(&["many"]).is_err());
        assert!(parse(&["-2"]).is_err());
    }

    #[test]
    fn rejects_trailing_arguments() {
        assert!(parse(&["4", "extra"]).is_err());
    }
}
