use approxdur::{timestamp, ApproxDuration};

fn main() {
    // Additive parsing: unit tokens in any order, any subset.
    let uptime = ApproxDuration::parse("6d2h5s").unwrap();
    println!("Parsed: {}", uptime);
    println!("Nanoseconds: {}", uptime.as_nanos());

    let window = ApproxDuration::parse("15m").unwrap();
    println!("15m is {} nanoseconds", window.as_nanos());

    // Negation applies to the whole sum.
    let behind = ApproxDuration::parse("~ -1d1h").unwrap();
    println!("Behind by: {}", behind);

    // Four rendering modes with tiered precision.
    println!("Compact exact: {}", uptime);
    println!("Compact approx: {}", uptime.approx());
    println!("Verbose exact: {}", uptime.pretty());
    println!("Verbose approx: {}", uptime.approx_pretty());

    // Below four days everything renders at full precision.
    let short = ApproxDuration::MINUTE * 90 + ApproxDuration::SECOND * 15;
    println!("Short durations stay exact: {}", short.approx());

    // Durations accumulate.
    let mut total = ApproxDuration::ZERO;
    for shift in ["8h", "7h30m", "9h15m"] {
        total += ApproxDuration::parse(shift).unwrap();
    }
    println!("Three shifts: {}", total.pretty());

    // JSON values coerce: strings through the parser, numbers as raw nanos.
    let from_json = ApproxDuration::try_from(&serde_json::json!("3mo")).unwrap();
    println!("From JSON: {}", from_json.approx());

    // Best-effort timestamp parsing against the known layouts.
    for text in [
        "2020-12-01T00:19:51.481Z",
        "Mon, 02 Jan 2006 15:04:05 MST",
        "2006-01-02",
    ] {
        match timestamp::parse_any(text) {
            Ok(parsed) => println!("{} -> {}", text, parsed),
            Err(err) => println!("{} -> {}", text, err),
        }
    }
}
