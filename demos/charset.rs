use clap::Parser;
use color_eyre::eyre::{bail, eyre, WrapErr};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bvset::bdd::Bdd;
use bvset::reference::Ref;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Comma-separated ranges, e.g. `a-z,0-9` or `0x41-0x5a,_`.
    #[arg(value_name = "RANGES")]
    ranges: String,

    /// Width of the character codes, in bits.
    #[clap(long, value_name = "INT", default_value = "16")]
    width: u32,

    /// Number of uniform samples to draw.
    #[clap(long, value_name = "INT", default_value = "5")]
    samples: usize,

    /// Seed of the sample generator.
    #[clap(long, value_name = "INT", default_value = "42")]
    seed: u64,

    /// Take the complement of the parsed set.
    #[clap(long)]
    complement: bool,
}

/// Parse a single bound: `0x..` hex, a decimal number, or a single character.
fn parse_bound(s: &str) -> color_eyre::Result<u64> {
    if let Some(hex) = s.strip_prefix("0x") {
        return u64::from_str_radix(hex, 16).wrap_err_with(|| format!("bad hex bound {:?}", s));
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c as u64),
        _ => s.parse().wrap_err_with(|| format!("bad bound {:?}", s)),
    }
}

fn parse_set(bdd: &Bdd, spec: &str, max_bit: u32) -> color_eyre::Result<Ref> {
    let mut res = bdd.empty();
    for item in spec.split(',').filter(|s| !s.is_empty()) {
        let (lo, hi) = match item.split_once('-') {
            Some((lo, hi)) if !lo.is_empty() && !hi.is_empty() => (parse_bound(lo)?, parse_bound(hi)?),
            _ => {
                let v = parse_bound(item)?;
                (v, v)
            }
        };
        if hi < lo {
            bail!("empty range {:?}", item);
        }
        let part = bdd.from_range(lo, hi, max_bit).wrap_err_with(|| format!("in range {:?}", item))?;
        res = bdd.apply_or(res, part);
    }
    Ok(res)
}

fn show(v: u64) -> String {
    match char::from_u32(v as u32) {
        Some(c) if v <= u32::MAX as u64 && !c.is_control() => format!("{:#x} {:?}", v, c),
        _ => format!("{:#x}", v),
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    if args.width == 0 || args.width > 64 {
        return Err(eyre!("width must be in 1..=64, got {}", args.width));
    }
    let max_bit = args.width - 1;

    let bdd = Bdd::default();
    let mut set = parse_set(&bdd, &args.ranges, max_bit)?;
    if args.complement {
        set = bdd.apply_not(set);
    }
    println!("set = {}", bdd.to_bracket_string(set));

    let ranges = bdd.to_ranges64(set, max_bit)?;
    println!("ranges ({}):", ranges.len());
    for (lo, hi) in ranges.iter().take(20) {
        println!("  [{} .. {}]", show(*lo), show(*hi));
    }
    if ranges.len() > 20 {
        println!("  ...");
    }

    println!("size = {}", bdd.domain_size(set, max_bit)?);
    if bdd.is_empty(set) {
        println!("set is empty, nothing to sample");
        return Ok(());
    }
    println!("min = {}", show(bdd.get_min(set)?));
    println!("max = {}", show(bdd.get_max(set, max_bit)?));

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for i in 0..args.samples {
        let v = bdd.choose_uniformly64(&mut rng, set, max_bit)?;
        println!("sample #{} = {}", i, show(v));
    }

    println!("bdd = {:?}", bdd);
    Ok(())
}
