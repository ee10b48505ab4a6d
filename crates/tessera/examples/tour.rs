//! Walk through every tessera feature on one arena.
//!
//! Run with `RUST_LOG=debug cargo run -p tessera --example tour` to see
//! allocation, growth and region events.

use tessera::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run() {
        error!(%err, "tour failed");
        std::process::exit(1);
    }
}

fn run() -> Result<(), ArenaError> {
    scalars()?;
    bounds()?;
    alignment()?;
    regions()?;
    nodes()?;
    arrays()?;
    vectors()?;
    strings()?;
    tables()?;
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ")
}

fn scalars() -> Result<(), ArenaError> {
    let mut arena = Arena::new(64)?;
    let int_addr = arena.alloc(4)?;
    arena.put_int(int_addr, 0x1234_5678)?;
    info!(addr = %int_addr, bytes = %hex(arena.read_bytes(int_addr, 4)?), value = arena.get_int(int_addr)?, "int");

    let long_addr = arena.alloc(8)?;
    arena.put_long(long_addr, i64::MAX)?;
    info!(bytes = %hex(arena.read_bytes(long_addr, 8)?), value = arena.get_long(long_addr)?, "long");

    let short_addr = arena.alloc(2)?;
    arena.put_short(short_addr, -2)?;
    info!(bytes = %hex(arena.read_bytes(short_addr, 2)?), value = arena.get_short(short_addr)?, "short");

    let char_addr = arena.alloc(2)?;
    arena.put_char(char_addr, 'Ω' as u16)?;
    info!(unit = arena.get_char(char_addr)?, "char");

    let flag_addr = arena.alloc(1)?;
    arena.put_boolean(flag_addr, true)?;
    info!(value = arena.get_boolean(flag_addr)?, "boolean");
    Ok(())
}

fn bounds() -> Result<(), ArenaError> {
    let mut arena = Arena::new(10)?;
    arena.alloc(5)?;
    if let Err(err) = arena.alloc(6) {
        info!(%err, "allocation past capacity rejected");
    }
    if let Err(err) = arena.get_int(Ptr(4)) {
        info!(%err, "read past allocation offset rejected");
    }
    Ok(())
}

fn alignment() -> Result<(), ArenaError> {
    let mut arena = Arena::new(64)?;
    arena.alloc(3)?;
    let aligned = arena.alloc_aligned(4, 4)?;
    info!(addr = %aligned, waste = arena.alignment_waste(), "aligned allocation");
    Ok(())
}

fn regions() -> Result<(), ArenaError> {
    let mut arena = Arena::new(128)?;
    let stack = arena.create_region(Ptr(0), 32, "Stack")?;
    let heap = arena.create_region(Ptr(32), 32, "Heap")?;
    info!(%stack, %heap, "regions created");
    if let Err(err) = arena.create_region(Ptr(30), 10, "Overlap") {
        info!(%err, "overlapping region rejected");
    }
    let data = arena.create_region_at_offset(16, "Data")?;
    info!(%data, inside_heap = arena.validate_address_in_region(Ptr(40), Some("Heap")), "region at offset");
    Ok(())
}

fn nodes() -> Result<(), ArenaError> {
    let mut arena = Arena::new(128)?;
    let mut nodes = NodeStore::new(&mut arena);
    let n1 = nodes.create_node(10)?;
    let n2 = nodes.create_node(20)?;
    let n3 = nodes.create_node(30)?;
    nodes.set_next(n1, n2)?;
    nodes.set_next(n2, n3)?;
    info!(values = ?nodes.collect_values(n1)?, "linked list");
    if let Err(err) = nodes.set_next(n3, Ptr(99_999)) {
        info!(%err, "dangling link rejected");
    }
    Ok(())
}

fn arrays() -> Result<(), ArenaError> {
    let mut arena = Arena::new(128)?;
    let mut arrays = ArrayStore::new(&mut arena);
    let arr = arrays.create_array(5, 4)?;
    for i in 0..5 {
        arrays.set_int(arr, i, (i as i32 + 1) * 10)?;
    }
    info!(values = ?arrays.to_vec::<i32>(arr)?, "int array");
    if let Err(err) = arrays.get_int(arr, 10) {
        info!(%err, "index past length rejected");
    }
    Ok(())
}

fn vectors() -> Result<(), ArenaError> {
    let mut arena = Arena::new(256)?;
    let mut vectors = VectorStore::new(&mut arena);
    let v = vectors.create_vector(2)?;
    for i in 0..5 {
        vectors.append(v, i * 10)?;
        info!(length = vectors.length(v)?, capacity = vectors.capacity(v)?, "appended");
    }
    vectors.set(v, 2, 999)?;
    info!(values = ?vectors.to_vec(v)?, used = vectors.arena().used(), "vector");
    Ok(())
}

fn strings() -> Result<(), ArenaError> {
    let mut arena = Arena::new(128)?;
    let mut strings = StringStore::new(&mut arena);
    let s = strings.create_string("Hello, World!")?;
    strings.set_char_at(s, 7, u16::from(b'R'))?;
    info!(text = %strings.get_string(s)?, length = strings.length(s)?, "string");
    Ok(())
}

fn tables() -> Result<(), ArenaError> {
    let mut arena = Arena::new(512)?;
    let mut tables = HashTableStore::new(&mut arena);
    let t = tables.create_hash_table(8)?;
    for (k, v) in [(1, 100), (2, 200), (10, 1000), (18, 1800)] {
        tables.put(t, k, v)?;
    }
    info!(chain = ?tables.bucket_chain(t, 2)?, "bucket 2 after collisions");
    tables.put(t, 10, 1001)?;
    tables.remove(t, 18)?;
    info!(
        get_10 = ?tables.get(t, 10)?,
        get_18 = ?tables.get(t, 18)?,
        entries = ?tables.entries(t)?,
        "after update and removal"
    );
    Ok(())
}
