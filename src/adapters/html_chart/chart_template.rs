//! Built-in standalone chart page.
//!
//! Chart.js scatter plot with `{{PLACEHOLDER}}` substitution. Quadrants are
//! tinted and labelled with the phase names; the instruments of each area are
//! listed in the matching corner.

pub fn template() -> &'static str {
    TEMPLATE
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{TITLE}}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        body { margin: 0; padding: 0; display: flex; justify-content: center; align-items: center; height: 100vh; background-color: #fff; font-family: sans-serif; }
        .chart-container { position: relative; width: 100vw; max-width: 600px; aspect-ratio: 1; }
        canvas { width: 100% !important; height: 100% !important; }
    </style>
</head>
<body>
    <div class="chart-container">
        <canvas id="sectorClockChart"></canvas>
    </div>
    <script>
    document.addEventListener("DOMContentLoaded", function() {
        var ctx = document.getElementById('sectorClockChart');
        var phaseLabels = {{PHASE_LABELS}};
        var areaLabels = {{AREA_LABELS}};

        var quadrantPlugin = {
            id: 'quadrantPlugin',
            beforeDraw: function(chart) {
                var c = chart.ctx;
                var ca = chart.chartArea;
                var midX = chart.scales.x.getPixelForValue(0);
                var midY = chart.scales.y.getPixelForValue(0);

                c.save();

                c.fillStyle = 'rgba(225, 250, 240, 0.5)';
                c.fillRect(ca.left, ca.top, midX - ca.left, midY - ca.top);
                c.fillStyle = 'rgba(255, 235, 235, 0.5)';
                c.fillRect(midX, ca.top, ca.right - midX, midY - ca.top);
                c.fillStyle = 'rgba(255, 252, 230, 0.5)';
                c.fillRect(midX, midY, ca.right - midX, ca.bottom - midY);
                c.fillStyle = 'rgba(235, 235, 250, 0.5)';
                c.fillRect(ca.left, midY, midX - ca.left, ca.bottom - midY);

                c.strokeStyle = 'rgba(0,0,0,0.2)';
                c.lineWidth = 1;
                c.beginPath();
                c.moveTo(midX, ca.top); c.lineTo(midX, ca.bottom);
                c.moveTo(ca.left, midY); c.lineTo(ca.right, midY);
                c.stroke();

                c.textAlign = 'center';
                c.textBaseline = 'middle';
                c.font = 'bold 16px sans-serif';
                c.fillStyle = 'rgba(0,0,0,0.4)';
                c.fillText(phaseLabels.NW, (ca.left + midX) / 2, (ca.top + midY) / 2);
                c.fillText(phaseLabels.NE, (midX + ca.right) / 2, (ca.top + midY) / 2);
                c.fillText(phaseLabels.SE, (midX + ca.right) / 2, (midY + ca.bottom) / 2);
                c.fillText(phaseLabels.SW, (ca.left + midX) / 2, (midY + ca.bottom) / 2);

                c.font = '10px sans-serif';
                c.fillStyle = 'rgba(0,0,0,0.5)';
                var pad = 10;
                var lh = 12;

                c.textAlign = 'left'; c.textBaseline = 'top';
                areaLabels.NW.forEach(function(t, i) { c.fillText(t, ca.left + pad, ca.top + pad + i * lh); });
                c.textAlign = 'right';
                areaLabels.NE.forEach(function(t, i) { c.fillText(t, ca.right - pad, ca.top + pad + i * lh); });
                c.textBaseline = 'bottom';
                areaLabels.SE.slice().reverse().forEach(function(t, i) { c.fillText(t, ca.right - pad, ca.bottom - pad - i * lh); });
                c.textAlign = 'left';
                areaLabels.SW.slice().reverse().forEach(function(t, i) { c.fillText(t, ca.left + pad, ca.bottom - pad - i * lh); });

                c.restore();
            }
        };

        new Chart(ctx, {
            type: 'scatter',
            data: {
                datasets: [
                    {
                        label: 'trajectory',
                        data: {{TRAJECTORY}},
                        borderWidth: 2,
                        pointRadius: 0,
                        showLine: true,
                        segment: {
                            borderColor: function(sc) {
                                var count = sc.chart.data.datasets[0].data.length;
                                var alpha = 0.1 + 0.9 * (sc.p1DataIndex / count);
                                return 'rgba(80, 80, 80, ' + alpha + ')';
                            }
                        },
                        order: 2
                    },
                    {
                        label: 'current',
                        data: {{CURRENT}},
                        backgroundColor: 'rgba(255, 0, 0, 1)',
                        borderColor: '#fff',
                        borderWidth: 2,
                        pointRadius: 8,
                        pointHoverRadius: 10,
                        order: 1
                    }
                ]
            },
            options: {
                responsive: true,
                maintainAspectRatio: false,
                scales: {
                    x: { min: -{{AXIS_LIMIT}}, max: {{AXIS_LIMIT}}, grid: { display: false }, ticks: { display: false } },
                    y: { min: -{{AXIS_LIMIT}}, max: {{AXIS_LIMIT}}, grid: { display: false }, ticks: { display: false } }
                },
                plugins: { legend: { display: false }, tooltip: { enabled: false } }
            },
            plugins: [quadrantPlugin]
        });
    });
    </script>
</body>
</html>
"#;
