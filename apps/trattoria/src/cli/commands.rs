//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Read-only commands use the load-or-empty entry point and report a
//! failed load. Mutating commands refuse to run on a file that does not
//! load, so a corrupt file is never overwritten by an empty store.

use super::ExportFormat;
use crate::config::AppConfig;
use crate::seed;
use std::path::{Path, PathBuf};
use trattoria_core::{
    CustomerId, EntityKind, IngredientId, Lifecycle, MenuItemId, OrderId, Restaurant,
    SerializableRestaurant, StaffId, TrattoriaError, load_from_path, load_or_empty,
    restaurant_to_bytes, save_to_path,
};

// =============================================================================
// HELPERS
// =============================================================================

/// Validate output path.
///
/// The parent directory must exist; it is canonicalized to resolve ".."
/// and symlinks.
fn validate_output_path(path: &Path) -> Result<PathBuf, TrattoriaError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        TrattoriaError::IoError(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(TrattoriaError::IoError(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| TrattoriaError::IoError("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

/// Load the restaurant for a mutating command.
///
/// A missing file is a fresh, empty restaurant; an unreadable one is an
/// error.
pub fn open_restaurant(data: &Path) -> Result<Restaurant, TrattoriaError> {
    if data.exists() {
        load_from_path(data)
    } else {
        tracing::info!(path = %data.display(), "no restaurant file yet; starting empty");
        Ok(Restaurant::new())
    }
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create an empty restaurant file.
pub fn cmd_init(data: &Path, force: bool) -> Result<(), TrattoriaError> {
    if data.exists() && !force {
        return Err(TrattoriaError::InvalidState(
            "Restaurant file already exists. Use --force to overwrite.".to_string(),
        ));
    }
    save_to_path(&Restaurant::new(), data)?;
    println!("Initialized empty restaurant at {:?}", data);
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show entity and link counts.
pub fn cmd_status(data: &Path, json_mode: bool) -> Result<(), TrattoriaError> {
    let outcome = load_or_empty(data);
    let r = &outcome.restaurant;
    let load_error = outcome.error.as_ref().map(ToString::to_string);

    if json_mode {
        let counts: serde_json::Map<String, serde_json::Value> = r
            .counts()
            .into_iter()
            .map(|(kind, n)| (kind.name().to_string(), n.into()))
            .collect();
        print_json(&serde_json::json!({
            "data": data.to_string_lossy(),
            "loaded": outcome.is_loaded(),
            "load_error": load_error,
            "counts": counts,
            "links": r.link_count(),
        }));
        return Ok(());
    }

    println!("Trattoria Status");
    println!("================");
    println!("Data: {:?}", data);
    if let Some(error) = load_error {
        println!("Load failed, showing an empty restaurant: {}", error);
    }
    println!();
    for (kind, n) in r.counts() {
        println!("{:<15} {}", format!("{}:", kind.name()), n);
    }
    println!();
    println!("Links:          {}", r.link_count());
    Ok(())
}

// =============================================================================
// SEED COMMAND
// =============================================================================

/// Fill an empty restaurant with demo data and save it.
pub fn cmd_seed(data: &Path, config: &AppConfig, json_mode: bool) -> Result<(), TrattoriaError> {
    let mut r = open_restaurant(data)?;
    let today = chrono::Local::now().date_naive();
    let summary = seed::seed(&mut r, &config.restaurant, today)?;
    save_to_path(&r, data)?;

    if json_mode {
        print_json(&serde_json::json!(summary));
    } else {
        println!(
            "Seeded {} entities and {} links into {:?}",
            summary.entities, summary.links, data
        );
    }
    Ok(())
}

// =============================================================================
// VERIFY COMMAND
// =============================================================================

/// Run the integrity verifier over the stored restaurant.
pub fn cmd_verify(data: &Path, json_mode: bool) -> Result<(), TrattoriaError> {
    let outcome = load_or_empty(data);
    if let Some(error) = outcome.error {
        if json_mode {
            print_json(&serde_json::json!({
                "consistent": false,
                "load_error": error.to_string(),
            }));
        }
        return Err(error);
    }

    let report = outcome.restaurant.verify_integrity();
    if json_mode {
        print_json(&serde_json::json!({
            "consistent": report.is_consistent(),
            "violations": report.violations,
            "shadowed": report.shadowed,
        }));
    } else {
        println!("Integrity Report");
        println!("================");
        for violation in &report.violations {
            println!("  VIOLATION {}", violation);
        }
        for reservation in &report.shadowed {
            println!("  shadowed  {} (slot held by an earlier booking)", reservation);
        }
        if report.is_consistent() {
            println!("OK: every relationship invariant holds");
        }
    }

    if report.is_consistent() {
        Ok(())
    } else {
        Err(TrattoriaError::InvalidState(format!(
            "{} integrity violation(s)",
            report.violations.len()
        )))
    }
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export the restaurant.
pub fn cmd_export(data: &Path, output: &Path, format: ExportFormat) -> Result<(), TrattoriaError> {
    let validated_output = validate_output_path(output)?;
    let r = open_restaurant(data)?;

    let bytes = match format {
        ExportFormat::Binary => restaurant_to_bytes(&r)?,
        ExportFormat::Json => serde_json::to_vec_pretty(&SerializableRestaurant::from(&r))
            .map_err(|e| TrattoriaError::SerializationError(e.to_string()))?,
    };

    std::fs::write(&validated_output, &bytes)
        .map_err(|e| TrattoriaError::IoError(format!("Write file: {}", e)))?;
    println!("Exported {} bytes to {:?}", bytes.len(), validated_output);
    Ok(())
}

// =============================================================================
// LISTING COMMANDS
// =============================================================================

/// List menus with their items and ingredients.
pub fn cmd_menu(data: &Path, json_mode: bool) -> Result<(), TrattoriaError> {
    let r = open_restaurant(data)?;

    let mut menus = Vec::new();
    for (menu_id, menu) in r.menus().iter() {
        let mut items = Vec::new();
        for item_id in r.menu_contents().targets(menu_id) {
            let item = r.menu_items().require(item_id)?;
            let mut ingredients = Vec::new();
            for ingredient in r.item_ingredients().targets(item_id) {
                ingredients.push(r.ingredients().require(ingredient)?.name.clone());
            }
            items.push(serde_json::json!({
                "id": item_id.0,
                "name": item.name,
                "price": item.price.to_string(),
                "vegetarian": item.vegetarian,
                "ingredients": ingredients,
                "rating_tenths": r.average_rating(item_id)?,
            }));
        }
        menus.push(serde_json::json!({
            "id": menu_id.0,
            "name": menu.name,
            "items": items,
        }));
    }

    if json_mode {
        print_json(&serde_json::Value::Array(menus));
        return Ok(());
    }

    for menu in &menus {
        println!("{} ({})", menu["name"].as_str().unwrap_or_default(), menu["id"]);
        for item in menu["items"].as_array().into_iter().flatten() {
            let ingredients: Vec<&str> = item["ingredients"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|v| v.as_str())
                .collect();
            println!(
                "  [{}] {:<24} {:>8}  {}",
                item["id"],
                item["name"].as_str().unwrap_or_default(),
                item["price"].as_str().unwrap_or_default(),
                ingredients.join(", ")
            );
        }
    }
    if menus.is_empty() {
        println!("No menus.");
    }
    Ok(())
}

/// List staff with role, manager profile and supervisor.
pub fn cmd_staff(data: &Path, json_mode: bool) -> Result<(), TrattoriaError> {
    let r = open_restaurant(data)?;
    let today = chrono::Local::now().date_naive();

    let mut rows = Vec::new();
    for (id, member) in r.staff().iter() {
        let supervisor = r.supervision().supervisor_of(id);
        rows.push(serde_json::json!({
            "id": id.0,
            "name": member.name,
            "role": member.role.name(),
            "department": member.manager.as_ref().map(|m| m.department.clone()),
            "supervisor": supervisor.map(|s| s.0),
            "subordinates": r.supervision().subordinates(id).map(|s| s.0).collect::<Vec<_>>(),
            "years_of_service": member.years_of_service(today),
        }));
    }

    if json_mode {
        print_json(&serde_json::Value::Array(rows));
        return Ok(());
    }

    for (id, member) in r.staff().iter() {
        let department = member
            .manager
            .as_ref()
            .map(|m| format!("manager, {}", m.department))
            .unwrap_or_else(|| "staff".to_string());
        let chain: Vec<String> = r
            .supervision()
            .chain(id)
            .into_iter()
            .filter_map(|s| r.staff().get(s).map(|m| m.name.clone()))
            .collect();
        println!(
            "[{}] {:<12} {:<10} {:<20} {}",
            id.0,
            member.name,
            member.role.name(),
            department,
            if chain.is_empty() {
                String::new()
            } else {
                format!("reports to {}", chain.join(" > "))
            }
        );
    }
    Ok(())
}

/// List a customer's reservations, flagging shadowed ones.
pub fn cmd_reservations(data: &Path, json_mode: bool, customer: u64) -> Result<(), TrattoriaError> {
    let r = open_restaurant(data)?;
    let customer = CustomerId(customer);
    let record = r.customers().require(customer)?;

    let mut rows = Vec::new();
    for (reservation, owner, slot) in r.bookings().references() {
        if owner != customer {
            continue;
        }
        let booking = r.reservations().require(reservation)?;
        rows.push(serde_json::json!({
            "id": reservation.0,
            "slot": slot.to_string(),
            "party_size": booking.party_size,
            "status": booking.status.name(),
            "tables": r.reservation_tables().targets(reservation).map(|t| t.0).collect::<Vec<_>>(),
            "shadowed": !r.bookings().is_registered(reservation),
        }));
    }

    if json_mode {
        print_json(&serde_json::json!({
            "customer": customer.0,
            "name": record.name,
            "reservations": rows,
        }));
        return Ok(());
    }

    println!("Reservations for {} ({})", record.name, customer);
    for row in &rows {
        println!(
            "  [{}] {}  party of {}  {}{}",
            row["id"],
            row["slot"].as_str().unwrap_or_default(),
            row["party_size"],
            row["status"].as_str().unwrap_or_default(),
            if row["shadowed"].as_bool().unwrap_or(false) {
                "  (shadowed)"
            } else {
                ""
            }
        );
    }
    if rows.is_empty() {
        println!("  none");
    }
    Ok(())
}

// =============================================================================
// MUTATION COMMANDS
// =============================================================================

/// Remove an ingredient from a menu item and save.
pub fn cmd_unlink_ingredient(data: &Path, item: u64, ingredient: u64) -> Result<(), TrattoriaError> {
    let mut r = open_restaurant(data)?;
    let (item, ingredient) = (MenuItemId(item), IngredientId(ingredient));
    r.unlink_ingredient(item, ingredient)?;
    save_to_path(&r, data)?;
    println!("Removed {} from {}", ingredient, item);
    Ok(())
}

/// Set a manager's supervisor and save.
pub fn cmd_supervise(data: &Path, staff: u64, supervisor: u64) -> Result<(), TrattoriaError> {
    let mut r = open_restaurant(data)?;
    let (staff, supervisor) = (StaffId(staff), StaffId(supervisor));
    let previous = r.set_supervisor(staff, supervisor)?;
    save_to_path(&r, data)?;
    match previous {
        Some(previous) if previous != supervisor => {
            println!("{} now reports to {} (was {})", staff, supervisor, previous);
        }
        _ => println!("{} now reports to {}", staff, supervisor),
    }
    Ok(())
}

/// Delete an order with everything it owns and save.
pub fn cmd_delete_order(data: &Path, order: u64) -> Result<(), TrattoriaError> {
    let mut r = open_restaurant(data)?;
    let order = OrderId(order);
    let before = r.link_count();
    let payments_before = r.count_of(EntityKind::Payment);
    r.delete_order(order)?;
    save_to_path(&r, data)?;
    println!(
        "Deleted {} ({} payment(s), {} link(s) removed)",
        order,
        payments_before - r.count_of(EntityKind::Payment),
        before - r.link_count()
    );
    Ok(())
}
