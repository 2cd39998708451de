use box_packer::render;
use box_packer::{Parcel, pack};
use clap::Parser;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "box_packer",
    about = "Estimate the standard shipping boxes needed for an order"
)]
struct Cli {
    /// Items as WxHxD[@grams][:qty] in mm (e.g. 100x100x30@250:2 20x100x30)
    #[arg(long = "item", num_args = 1.., required = true)]
    items: Vec<String>,

    /// Show an ASCII top view of each box
    #[arg(long)]
    layout: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log packing decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<(u32, u32, u32), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 3 {
        return Err(format!("invalid dimensions '{}', expected WxHxD", s));
    }
    let mut dims = [0u32; 3];
    for (dim, (part, axis)) in dims
        .iter_mut()
        .zip(parts.iter().zip(["width", "height", "depth"]))
    {
        *dim = part
            .parse::<u32>()
            .map_err(|_| format!("invalid {} in '{}'", axis, s))?;
    }
    if dims.contains(&0) {
        return Err(format!("dimensions must be non-zero in '{}'", s));
    }
    Ok((dims[0], dims[1], dims[2]))
}

fn parse_item(s: &str) -> Result<(Parcel, u32), String> {
    let (spec, qty) = match s.split_once(':') {
        Some((spec, qty)) => {
            let qty = qty
                .parse::<u32>()
                .map_err(|_| format!("invalid quantity in '{}'", s))?;
            (spec, qty)
        }
        None => (s, 1),
    };
    if qty == 0 {
        return Err(format!("quantity must be non-zero in '{}'", s));
    }
    let (dims, weight) = match spec.split_once('@') {
        Some((dims, weight)) => {
            let weight = weight
                .parse::<u32>()
                .map_err(|_| format!("invalid weight in '{}'", s))?;
            (dims, weight)
        }
        None => (spec, 0),
    };
    let (width, height, depth) = parse_dimensions(dims)?;
    Ok((Parcel::new(width, height, depth, weight).with_name(spec), qty))
}

fn expand(items: &[(Parcel, u32)]) -> Vec<Parcel> {
    items
        .iter()
        .flat_map(|(parcel, qty)| std::iter::repeat_n(parcel.clone(), *qty as usize))
        .collect()
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let requested: Vec<(Parcel, u32)> = cli
        .items
        .iter()
        .map(|s| parse_item(s))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
    let parcels = expand(&requested);

    let boxes = pack(&parcels).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.json {
        match serde_json::to_string_pretty(&boxes) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for (i, bx) in boxes.iter().enumerate() {
        println!(
            "Box {}: {} ({} g, {:.1}% full)",
            i + 1,
            bx.template,
            bx.total_weight(),
            bx.fill_percent()
        );
        for bi in &bx.items {
            let [x, y, z] = bi.position;
            println!("  {} @ ({}, {}, {}) {}", bi.item, x, y, z, bi.rotation);
        }
        if cli.layout {
            print!("{}", render::render_box(bx));
        }
        println!();
    }

    let gross: u64 = boxes.iter().map(|bx| bx.total_weight()).sum();
    println!(
        "Summary: {} item{} in {} box{}, {} g total",
        parcels.len(),
        if parcels.len() == 1 { "" } else { "s" },
        boxes.len(),
        if boxes.len() == 1 { "" } else { "es" },
        gross,
    );
}
