use crate::models::{
    RenderColor, RenderHint, RouteStep, StopCount, TransitDetails, TransitSummary, TravelMode,
};

/// Map one directions step to the color and tooltip used to draw it.
pub fn classify_step(step: &RouteStep) -> RenderHint {
    match (step.travel_mode, &step.transit_details) {
        (TravelMode::Walk, _) => RenderHint {
            color: RenderColor::Blue,
            label: "walking".to_string(),
        },
        (TravelMode::Transit, Some(details)) => RenderHint {
            color: vehicle_color(&details.vehicle_type),
            label: format!(
                "{} {}: {} → {}",
                details.vehicle_type,
                details.line_name,
                details.departure_stop,
                details.arrival_stop
            ),
        },
        (TravelMode::Transit, None) => RenderHint {
            color: RenderColor::Orange,
            label: "transit".to_string(),
        },
        (TravelMode::Other, _) => RenderHint {
            color: RenderColor::Gray,
            label: "other".to_string(),
        },
    }
}

fn vehicle_color(vehicle_type: &str) -> RenderColor {
    match vehicle_type {
        "BUS" => RenderColor::Green,
        "SUBWAY" => RenderColor::Purple,
        _ => RenderColor::Orange,
    }
}

/// Transfer table rows for the transit legs of `steps`, in route order.
///
/// The iterator borrows `steps` and holds no other state, so calling this
/// again on the same slice yields the same rows.
pub fn summarize_transit(steps: &[RouteStep]) -> impl Iterator<Item = TransitSummary> + '_ {
    steps
        .iter()
        .filter(|step| step.travel_mode == TravelMode::Transit)
        .map(|step| match &step.transit_details {
            Some(details) => summary_from_details(details),
            None => TransitSummary {
                segment_label: " → ".to_string(),
                vehicle: String::new(),
                line: String::new(),
                heading: String::new(),
                stop_count: StopCount::unknown(),
            },
        })
}

fn summary_from_details(details: &TransitDetails) -> TransitSummary {
    TransitSummary {
        segment_label: format!("{} → {}", details.departure_stop, details.arrival_stop),
        vehicle: details.vehicle_type.clone(),
        line: details.line_name.clone(),
        heading: details.headsign.clone().unwrap_or_default(),
        stop_count: details.stop_count.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> RouteStep {
        RouteStep {
            travel_mode: TravelMode::Walk,
            encoded_path: "_p~iF~ps|U".to_string(),
            transit_details: None,
        }
    }

    fn transit(vehicle: &str, line: &str, stop_count: Option<u32>) -> RouteStep {
        RouteStep {
            travel_mode: TravelMode::Transit,
            encoded_path: "_ulLnnqC".to_string(),
            transit_details: Some(TransitDetails {
                vehicle_type: vehicle.to_string(),
                line_name: line.to_string(),
                departure_stop: "A".to_string(),
                arrival_stop: "B".to_string(),
                headsign: None,
                stop_count,
            }),
        }
    }

    #[test]
    fn bus_step_is_green_with_line_label() {
        let hint = classify_step(&transit("BUS", "143", None));
        assert_eq!(
            hint,
            RenderHint {
                color: RenderColor::Green,
                label: "BUS 143: A → B".to_string(),
            }
        );
    }

    #[test]
    fn colors_by_mode_and_vehicle() {
        assert_eq!(classify_step(&walk()).color, RenderColor::Blue);
        assert_eq!(classify_step(&walk()).label, "walking");
        assert_eq!(
            classify_step(&transit("SUBWAY", "2호선", None)).color,
            RenderColor::Purple
        );
        assert_eq!(
            classify_step(&transit("HEAVY_RAIL", "KTX", None)).color,
            RenderColor::Orange
        );
    }

    #[test]
    fn unknown_mode_falls_back_to_gray() {
        let step = RouteStep {
            travel_mode: TravelMode::Other,
            encoded_path: String::new(),
            transit_details: None,
        };
        let hint = classify_step(&step);
        assert_eq!(hint.color, RenderColor::Gray);
        assert_eq!(hint.label, "other");
    }

    #[test]
    fn transit_without_details_is_orange() {
        let step = RouteStep {
            travel_mode: TravelMode::Transit,
            encoded_path: String::new(),
            transit_details: None,
        };
        assert_eq!(classify_step(&step).color, RenderColor::Orange);
    }

    #[test]
    fn summary_keeps_transit_steps_in_order() {
        let steps = vec![
            transit("BUS", "143", Some(5)),
            walk(),
            transit("SUBWAY", "2호선", None),
        ];
        let summaries: Vec<_> = summarize_transit(&steps).collect();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].line, "143");
        assert_eq!(summaries[0].stop_count, StopCount::Count(5));
        assert_eq!(summaries[1].line, "2호선");
        assert_eq!(summaries[1].stop_count, StopCount::unknown());
        assert_eq!(summaries[1].segment_label, "A → B");
        assert_eq!(summaries[1].heading, "");
    }

    #[test]
    fn summary_is_restartable() {
        let steps = vec![walk(), transit("BUS", "7016", Some(3))];
        let first: Vec<_> = summarize_transit(&steps).collect();
        let second: Vec<_> = summarize_transit(&steps).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn summary_uses_headsign_when_present() {
        let mut step = transit("BUS", "470", Some(12));
        if let Some(details) = step.transit_details.as_mut() {
            details.headsign = Some("Seoul Station".to_string());
        }
        let summary = summarize_transit(std::slice::from_ref(&step)).next().unwrap();
        assert_eq!(summary.heading, "Seoul Station");
        assert_eq!(summary.vehicle, "BUS");
    }
}
