use std::io::{self, Write};

use crate::sim::Sample;

/// Write per-cycle telemetry in CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z, descent_rate,
///          velocity_setpoint, thrust, thrust_lower, thrust_upper, neutral,
///          phase, active
pub fn write_samples<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,descent_rate,\
         velocity_setpoint,thrust,thrust_lower,thrust_upper,neutral,phase,active"
    )?;

    for s in samples {
        let st = &s.state;
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},\
             {:.4},{:.6},{:.4},{:.4},{:.6},{},{}",
            st.time,
            st.pos.x, st.pos.y, st.pos.z,
            st.vel.x, st.vel.y, st.vel.z,
            st.descent_rate(),
            s.velocity_setpoint,
            s.thrust,
            s.bounds.lower,
            s.bounds.upper,
            s.neutral,
            s.phase,
            u8::from(s.active),
        )?;
    }

    Ok(())
}

/// Write telemetry to a CSV file at the given path.
pub fn write_samples_file(path: &str, samples: &[Sample]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_samples(&mut file, samples)?;
    file.flush()
}
