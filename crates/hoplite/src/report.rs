use hoplite_core::{Hop, PingReport, ProbeOutcome, Query, TimeToLive};
use std::net::Ipv4Addr;

/// Print the header line for a ping session.
pub fn print_ping_header(target: &str, target_addr: Ipv4Addr) {
    println!("PING {target} ({target_addr})");
}

/// Print a single probe outcome as it completes.
pub fn print_probe_outcome(outcome: &ProbeOutcome) {
    match outcome {
        ProbeOutcome::Reply(reply) => {
            let round_trip = reply.round_trip().as_secs_f64() * 1000.0;
            println!(
                "Reply from {}: icmp_seq={} time={round_trip:.2} ms",
                reply.responder, reply.sequence.0
            );
        }
        ProbeOutcome::TimedOut(probe) => {
            println!("Request timeout for icmp_seq {}", probe.sequence.0);
        }
    }
}

/// Print the summary statistics for a completed ping session.
pub fn print_ping_report(report: &PingReport) {
    println!();
    if let Some(loss) = report.loss_percent() {
        println!(
            "{} packets transmitted, {} received, {loss:.0}% packet loss",
            report.sent, report.received
        );
    } else {
        println!(
            "{} packets transmitted, {} received",
            report.sent, report.received
        );
    }
    if let Some(rtt) = report.rtt {
        println!(
            "round-trip min/avg/max = {:.3}/{:.3}/{:.3} ms",
            rtt.min.as_secs_f64() * 1000.0,
            rtt.mean.as_secs_f64() * 1000.0,
            rtt.max.as_secs_f64() * 1000.0
        );
    }
}

/// Print the header line for a traceroute session.
pub fn print_trace_header(target: &str, target_addr: Ipv4Addr, max_ttl: TimeToLive) {
    println!(
        "traceroute to {target} ({target_addr}), {} hops max",
        max_ttl.0
    );
}

/// Print a single hop as it completes.
///
/// Answered queries which carry no resolved name show the responder
/// address in both positions, as the original tools do.
pub fn print_hop(hop: &Hop, summary: bool) {
    print!("{} ", hop.ttl.0);
    for query in &hop.queries {
        match query {
            Query::Answered(answer) => {
                let addr = answer.responder;
                let round_trip = answer.round_trip.as_secs_f64() * 1000.0;
                let host = answer.name.clone().unwrap_or_else(|| addr.to_string());
                print!("{host} ({addr}) {round_trip:.3} ms ");
            }
            Query::Unanswered => print!("* "),
        }
    }
    if summary {
        print!(" | {} unanswered", hop.unanswered());
    }
    println!();
}
