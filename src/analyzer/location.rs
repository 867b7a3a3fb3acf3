use crate::model::Store;

const EARTH_RADIUS_KM: f64 = 6371.0;
const WALKING_SPEED_KMH: f64 = 5.0;

/// Great-circle distance in kilometres (haversine).
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn store_distance_km(store: &Store, latitude: f64, longitude: f64) -> f64 {
    distance_km(latitude, longitude, store.latitude, store.longitude)
}

/// Stores within `radius_km` of the point, nearest first.
pub fn stores_within(stores: Vec<Store>, latitude: f64, longitude: f64, radius_km: f64) -> Vec<Store> {
    let mut near: Vec<(f64, Store)> = stores
        .into_iter()
        .map(|s| (store_distance_km(&s, latitude, longitude), s))
        .filter(|(d, _)| *d <= radius_km)
        .collect();
    near.sort_by(|a, b| a.0.total_cmp(&b.0));
    near.into_iter().map(|(_, s)| s).collect()
}

pub fn walking_minutes(distance_km: f64) -> u32 {
    (distance_km / WALKING_SPEED_KMH * 60.0).round() as u32
}

/// Case-insensitive search over name, chain and address.
pub fn filter_stores<'s>(stores: &'s [Store], query: &str) -> Vec<&'s Store> {
    let query = query.to_lowercase();
    stores
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&query)
                || s.chain.to_lowercase().contains(&query)
                || s.address.to_lowercase().contains(&query)
        })
        .collect()
}

pub fn directions_url(store: &Store) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        store.latitude, store.longitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(id: i64, name: &str, chain: &str, lat: f64, lon: f64) -> Store {
        Store {
            id,
            name: name.into(),
            chain: chain.into(),
            address: format!("{} Street, Manchester", name),
            postcode: "M1".into(),
            phone: None,
            latitude: lat,
            longitude: lon,
            opening_hours: "24 hours".into(),
        }
    }

    #[test]
    fn known_distance_between_cities() {
        // Manchester to London is roughly 262 km.
        let d = distance_km(53.4808, -2.2426, 51.5074, -0.1278);
        assert!((d - 262.0).abs() < 3.0, "got {}", d);
        assert_eq!(distance_km(53.0, -2.0, 53.0, -2.0), 0.0);
    }

    #[test]
    fn stores_are_filtered_by_radius_and_sorted() {
        let stores = vec![
            store(1, "Far", "ASDA", 53.4831, -2.2007),
            store(2, "Near", "Tesco", 53.4834, -2.2426),
            store(3, "Here", "M&S", 53.4808, -2.2426),
        ];
        let near = stores_within(stores, 53.4808, -2.2426, 1.0);
        let ids: Vec<i64> = near.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn walking_time_at_five_kmh() {
        assert_eq!(walking_minutes(1.0), 12);
        assert_eq!(walking_minutes(0.0), 0);
        assert_eq!(walking_minutes(2.5), 30);
    }

    #[test]
    fn search_matches_chain_name_or_address() {
        let stores = vec![store(1, "Arndale", "Tesco", 0.0, 0.0), store(2, "Deansgate", "Sainsbury's", 0.0, 0.0)];
        assert_eq!(filter_stores(&stores, "tesco").len(), 1);
        assert_eq!(filter_stores(&stores, "DEANS").len(), 1);
        assert_eq!(filter_stores(&stores, "manchester").len(), 2);
        assert!(directions_url(&stores[0]).ends_with("destination=0,0"));
    }
}
