use std::time::{Duration, Instant};

use chrono::{Datelike, Days, NaiveDate};

use leasehold::directory::Directory;
use leasehold::rental_file;

const FLOORS: u8 = 10;
const FIRST_ROOM: u8 = 10;
const ROOMS_PER_FLOOR: u8 = 30;
const CLIENTS: usize = 200;

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    if latencies.is_empty() {
        println!("  {label}: no samples");
        return;
    }
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len() as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.3}ms, p50={:.3}ms, p95={:.3}ms, p99={:.3}ms, max={:.3}ms",
        latencies.len(),
        avg.as_secs_f64() * 1000.0,
        percentile(latencies, 50.0).as_secs_f64() * 1000.0,
        percentile(latencies, 95.0).as_secs_f64() * 1000.0,
        percentile(latencies, 99.0).as_secs_f64() * 1000.0,
        latencies[latencies.len() - 1].as_secs_f64() * 1000.0,
    );
}

/// Every floor gets offices, conference rooms and suites in rotation.
fn setup() -> Directory {
    let mut dir = Directory::new();
    for floor in 1..=FLOORS {
        for room in FIRST_ROOM..FIRST_ROOM + ROOMS_PER_FLOOR {
            let (kind, capacity) = match room % 3 {
                0 => ("Office", 150),
                1 => ("Conference Room", 25),
                _ => ("Hotel Suite", 2),
            };
            dir.add_new_unit(kind, &format!("{floor}-{room}"), capacity)
                .expect("unit");
        }
    }
    for n in 0..CLIENTS {
        dir.add_new_client(&format!("Client {n}"), &format!("c{n:04}"))
            .expect("client");
    }
    println!("  created {} units and {CLIENTS} clients", dir.units().count());
    dir
}

fn start_for(kind_slot: usize, step: usize) -> NaiveDate {
    let base = NaiveDate::from_ymd_opt(2021, 1, 1).expect("date");
    match kind_slot {
        // offices: first of a month
        0 => base.with_month0((step % 12) as u32).unwrap_or(base),
        // conference rooms: any day
        1 => base + Days::new((step * 3) as u64),
        // suites: Sundays, 2021-01-03 is the first
        _ => base + Days::new(2 + (step * 7) as u64),
    }
}

fn phase1_reserve(dir: &mut Directory) {
    let units = dir.units().count();
    let mut latencies = Vec::new();
    let mut rejected = 0usize;
    let start = Instant::now();

    for step in 0..40 {
        for unit in 0..units {
            let room = unit % ROOMS_PER_FLOOR as usize + FIRST_ROOM as usize;
            let date = start_for(room % 3, step);
            let client = (unit + step) % CLIENTS;
            let t = Instant::now();
            if dir.create_lease(client, unit, date, 1, 1).is_err() {
                rejected += 1;
            }
            latencies.push(t.elapsed());
        }
    }

    let elapsed = start.elapsed();
    let n = latencies.len();
    let ops = n as f64 / elapsed.as_secs_f64();
    println!("  {n} attempts in {:.2}s = {ops:.0} ops/sec ({rejected} rejected)", elapsed.as_secs_f64());
    print_latency("create_lease", &mut latencies);
}

fn phase2_listings(dir: &Directory) {
    let mut latencies = Vec::new();
    for client in 0..CLIENTS {
        let t = Instant::now();
        let _ = dir.list_client_leases(client).expect("listing");
        latencies.push(t.elapsed());
    }
    print_latency("list_client_leases", &mut latencies);
}

fn phase3_file(dir: &Directory) {
    let t = Instant::now();
    let text = rental_file::render_rental_data(dir).expect("render");
    let render = t.elapsed();

    let mut reloaded = Directory::new();
    let t = Instant::now();
    rental_file::parse_rental_data(&text, &mut reloaded).expect("parse");
    let parse = t.elapsed();

    println!(
        "  {} bytes: render={:.2}ms, parse={:.2}ms",
        text.len(),
        render.as_secs_f64() * 1000.0,
        parse.as_secs_f64() * 1000.0
    );
}

fn phase4_cutover(dir: &mut Directory) {
    let cutoff = NaiveDate::from_ymd_opt(2021, 6, 15).expect("date");
    let mut latencies = Vec::new();
    let mut cancelled = 0usize;
    // the filter is off, so removing in index order walks every unit
    for unit in 0..dir.units().count() {
        let t = Instant::now();
        cancelled += dir.remove_from_service(unit, cutoff).expect("cutover").len();
        latencies.push(t.elapsed());
    }
    println!("  {cancelled} leases cancelled");
    print_latency("remove_from_service", &mut latencies);
}

fn main() {
    println!("=== leasehold stress benchmark ===");

    println!("[setup]");
    let mut dir = setup();

    println!("\n[phase 1] lease creation throughput");
    phase1_reserve(&mut dir);

    println!("\n[phase 2] client listing latency");
    phase2_listings(&dir);

    println!("\n[phase 3] rental file render and parse");
    phase3_file(&dir);

    println!("\n[phase 4] cutover latency");
    phase4_cutover(&mut dir);
}
