//! Plain-text rendering of domain values for the terminal

use std::fmt::Write;

use application::PostalAddress;
use domain::{Address, Itinerary, Stop, StopRole, Student};

/// One-line address
pub fn address(address: &Address) -> String {
    let mut line = address.search_query();
    if let Some(code) = address.postal_code.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(line, " (CEP {code})");
    }
    line
}

/// One roster line: id, going mark, name, phone and address
pub fn student(student: &Student) -> String {
    let mark = if student.going { "x" } else { " " };
    format!(
        "{:>14}  [{mark}] {}  {}  {}",
        student.id,
        student.name,
        student.phone,
        address(&student.address)
    )
}

/// Postal code lookup result
pub fn postal_address(found: &PostalAddress) -> String {
    let mut out = format!("CEP {}\n", found.postal_code);
    let _ = writeln!(out, "  Street:       {}", or_dash(&found.street));
    if let Some(complement) = found.complement.as_deref() {
        let _ = writeln!(out, "  Complement:   {complement}");
    }
    let _ = writeln!(
        out,
        "  Neighborhood: {}",
        or_dash(found.neighborhood.as_deref().unwrap_or_default())
    );
    let _ = write!(out, "  City:         {} - {}", found.city, found.state);
    out
}

/// Summary header followed by one line per stop
pub fn itinerary(itinerary: &Itinerary) -> String {
    let summary = itinerary.summary();
    let mut out = String::new();
    let _ = writeln!(out, "Distance: {}", summary.total_distance);
    let _ = writeln!(out, "Duration: {}", summary.total_duration);
    let _ = writeln!(
        out,
        "Stops:    {} ({} students)",
        summary.total_stops, summary.students_count
    );
    let _ = writeln!(
        out,
        "Computed: {}",
        itinerary.computed_at().format("%Y-%m-%d %H:%M UTC")
    );
    for stop in itinerary.stops() {
        out.push('\n');
        out.push_str(&self::stop(stop));
    }
    out
}

fn stop(stop: &Stop) -> String {
    let marker = match stop.role {
        StopRole::Start => "🚌",
        StopRole::Student => "🧒",
        StopRole::End => "🏫",
    };
    let mut line = format!(
        "{:>3}. {marker} {}  {}  [{:.5}, {:.5}]",
        stop.order,
        stop.name,
        address(&stop.address),
        stop.coordinate.latitude(),
        stop.coordinate.longitude()
    );
    if let Some(phone) = stop.phone.as_deref() {
        let _ = write!(line, "  tel {phone}");
    }
    line
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}
