use polyscribe::{ShapeOps, Sketch};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let input = std::env::args()
        .nth(1)
        .map(|path| std::fs::read_to_string(&path).expect("Failed to read file"))
        .unwrap_or_else(|| "[38.8979, -77.0333] then [1,2],[3,4],[5,6]".to_string());

    let mut sketch = Sketch::new();
    let key = sketch.segments()[0].key;
    sketch.update_literal(key, &input);
    sketch.commit(key);

    println!("segments:");
    for seg in sketch.segments() {
        println!("  {:<8} {seg}", seg.kind());
    }

    if !sketch.has_proposed_shapes() {
        eprintln!("No shapes found in input");
        return;
    }

    sketch.add_from_segments(false);
    println!("shapes:");
    for shape in sketch.shapes() {
        println!("  {} ({}) {shape}", shape.key(), shape.color());
    }
    if let Some(bounds) = sketch.bounds() {
        println!("bounds: {} .. {}", bounds.south_west(), bounds.north_east());
    }
}
